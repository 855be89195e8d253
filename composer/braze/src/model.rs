use beacon_common_api::{Payload, Value};
use serde::{Deserialize, Serialize};

pub const EXTERNAL_ID_KEY: &str = "external_id";

/// A user profile update, one entry of the `attributes` array of `/users/track`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundAttribute {
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_alias: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub braze_id: Option<String>,
    #[serde(flatten)]
    pub properties: Payload,
}

impl OutboundAttribute {
    /// Merges the user properties with the external id.
    /// The external id always wins over a property with the same key.
    pub fn new<S: Into<String>>(external_id: S, mut properties: Payload) -> OutboundAttribute {
        properties.remove(EXTERNAL_ID_KEY);
        OutboundAttribute {
            external_id: external_id.into(),
            user_alias: None,
            braze_id: None,
            properties,
        }
    }
}

/// A custom event, one entry of the `events` array of `/users/track`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEventRecord {
    pub external_id: String,
    pub name: String,
    pub time: String,
    pub properties: Payload,
}

/// The body of a `/users/track` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersTrackBody {
    pub attributes: Vec<OutboundAttribute>,
    pub events: Vec<OutboundEventRecord>,
}

impl UsersTrackBody {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.events.is_empty()
    }
}

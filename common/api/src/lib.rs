use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Deserializer, Serialize};
pub use serde_json::{Map, Value};

pub mod error;

pub use error::CommonError;

/// The property key that carries the user attribute updates of an Event.
pub const SET_PROPERTIES_KEY: &str = "$set";

pub type Payload = Map<String, Value>;

/// An Event is a single user action captured by the analytics pipeline.
/// Events are received one at a time and handed to the Composers, which decide
/// whether, and how, they are forwarded to an external destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Event {
    #[serde(rename = "event")]
    pub name: String,
    pub distinct_id: String,
    /// Malformed timestamps are dropped and treated as absent
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<u64>,
}

impl Event {
    pub fn new<N: Into<String>, D: Into<String>>(name: N, distinct_id: D) -> Event {
        Event::new_with_properties(name, distinct_id, Payload::new())
    }

    pub fn new_with_properties<N: Into<String>, D: Into<String>>(
        name: N,
        distinct_id: D,
        properties: Payload,
    ) -> Event {
        Event {
            name: name.into(),
            distinct_id: distinct_id.into(),
            properties,
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Event, CommonError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the user attribute updates carried by the event, if any.
    pub fn set_properties(&self) -> Option<&Payload> {
        self.properties.get(SET_PROPERTIES_KEY).and_then(ValueExt::get_map)
    }

    /// Returns a copy of the event properties without the user attribute updates.
    pub fn properties_without_set(&self) -> Payload {
        self.properties
            .iter()
            .filter(|(key, _)| key.as_str() != SET_PROPERTIES_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let timestamp = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => match text.parse::<DateTime<Utc>>() {
            Ok(timestamp) => Some(timestamp),
            Err(err) => {
                debug!("Event - Ignoring unparseable timestamp [{}]. Err: {}", text, err);
                None
            }
        },
        Some(other) => {
            debug!("Event - Ignoring timestamp of unexpected type [{}]", other);
            None
        }
    };
    Ok(timestamp)
}

pub trait ValueExt {
    fn get_map(&self) -> Option<&Payload>;
}

impl ValueExt for Value {
    fn get_map(&self) -> Option<&Payload> {
        match self {
            Value::Object(payload) => Some(payload),
            _ => None,
        }
    }
}

use crate::region::BrazeRegion;
use beacon_composer_common::ComposerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The Braze app configuration, as delivered by the plugin host.
/// Every value is a string; see [`BrazeExportConfig`] for the parsed form.
/// Fields are camelCase as in the plugin host; the snake_case names are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrazeAppConfig {
    /// The region code of the Braze REST endpoint, e.g. `US-03`
    #[serde(default, alias = "braze_endpoint")]
    pub braze_endpoint: String,

    /// The REST API key, sent as bearer token
    #[serde(default, alias = "api_key")]
    pub api_key: String,

    #[serde(default, alias = "import_campaigns")]
    pub import_campaigns: YesNo,
    #[serde(default, alias = "import_canvases")]
    pub import_canvases: YesNo,
    #[serde(default, alias = "import_custom_events")]
    pub import_custom_events: YesNo,
    #[serde(default, alias = "import_feeds")]
    pub import_feeds: YesNo,

    /// Comma separated list of the event names to export
    #[serde(default, alias = "events_to_export")]
    pub events_to_export: Option<String>,

    /// Comma separated list of the `$set` keys to export as user attributes
    #[serde(default, alias = "user_properties_to_export")]
    pub user_properties_to_export: Option<String>,

    /// If `Yes`, user attributes are exported with every event, not only with the exported ones
    #[serde(default, alias = "import_user_attributes_in_all_events")]
    pub import_user_attributes_in_all_events: YesNo,
}

/// A `Yes`/`No` toggle. Any value other than the literal `Yes` counts as `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl From<&str> for YesNo {
    fn from(value: &str) -> Self {
        match value {
            "Yes" => YesNo::Yes,
            _ => YesNo::No,
        }
    }
}

impl From<String> for YesNo {
    fn from(value: String) -> Self {
        YesNo::from(value.as_str())
    }
}

impl From<YesNo> for String {
    fn from(value: YesNo) -> Self {
        value.to_string()
    }
}

impl From<YesNo> for bool {
    fn from(value: YesNo) -> Self {
        value == YesNo::Yes
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YesNo::Yes => f.write_str("Yes"),
            YesNo::No => f.write_str("No"),
        }
    }
}

/// An ordered list of names parsed from a comma separated value.
/// Entries are kept exactly as written: no trimming, no wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    pub fn parse(value: Option<&str>) -> AllowList {
        match value {
            None | Some("") => AllowList::default(),
            Some(value) => AllowList { entries: value.split(',').map(str::to_owned).collect() },
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry == name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// The validated Braze configuration used by the composer.
#[derive(Debug, Clone, PartialEq)]
pub struct BrazeExportConfig {
    pub region: BrazeRegion,
    pub api_key: String,
    pub events_to_export: AllowList,
    pub user_properties_to_export: AllowList,
    pub import_user_attributes_in_all_events: bool,

    // These toggles drive the Braze to PostHog import, they do not change the export.
    pub import_campaigns: bool,
    pub import_canvases: bool,
    pub import_custom_events: bool,
    pub import_feeds: bool,
}

impl TryFrom<&BrazeAppConfig> for BrazeExportConfig {
    type Error = ComposerError;

    fn try_from(config: &BrazeAppConfig) -> Result<Self, Self::Error> {
        Ok(BrazeExportConfig {
            region: config.braze_endpoint.parse()?,
            api_key: config.api_key.clone(),
            events_to_export: AllowList::parse(config.events_to_export.as_deref()),
            user_properties_to_export: AllowList::parse(
                config.user_properties_to_export.as_deref(),
            ),
            import_user_attributes_in_all_events: config
                .import_user_attributes_in_all_events
                .into(),
            import_campaigns: config.import_campaigns.into(),
            import_canvases: config.import_canvases.into(),
            import_custom_events: config.import_custom_events.into(),
            import_feeds: config.import_feeds.into(),
        })
    }
}

impl TryFrom<BrazeAppConfig> for BrazeExportConfig {
    type Error = ComposerError;

    fn try_from(config: BrazeAppConfig) -> Result<Self, Self::Error> {
        BrazeExportConfig::try_from(&config)
    }
}

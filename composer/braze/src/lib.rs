use crate::config::{BrazeAppConfig, BrazeExportConfig};
use crate::model::{OutboundAttribute, OutboundEventRecord, UsersTrackBody};
use crate::time::{format_braze_time, midnight_of_today};
use beacon_common_api::{Event, Payload};
use beacon_composer_common::{
    Clock, ComposerError, RequestDescriptor, StatelessComposer, SystemClock,
};
use log::*;
use tracing::instrument;

pub mod config;
pub mod model;
pub mod region;
pub mod time;

pub const USERS_TRACK_PATH: &str = "/users/track";

/// A composer that exports Events and user attributes to the Braze `/users/track` API
pub struct BrazeComposer<C: Clock = SystemClock> {
    config: BrazeExportConfig,
    clock: C,
}

impl<C: Clock> std::fmt::Display for BrazeComposer<C> {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.write_str("BrazeComposer")?;
        Ok(())
    }
}

impl BrazeComposer {
    pub fn new(config: &BrazeAppConfig) -> Result<BrazeComposer, ComposerError> {
        Ok(BrazeComposer::with_clock(BrazeExportConfig::try_from(config)?, SystemClock))
    }
}

impl<C: Clock> BrazeComposer<C> {
    pub fn with_clock(config: BrazeExportConfig, clock: C) -> BrazeComposer<C> {
        BrazeComposer { config, clock }
    }

    pub fn config(&self) -> &BrazeExportConfig {
        &self.config
    }
}

impl<C: Clock> StatelessComposer for BrazeComposer<C> {
    fn compose(&self, event: &Event) -> Result<Option<RequestDescriptor>, ComposerError> {
        trace!("BrazeComposer - received event: \n[{:?}]", event);
        compose(event, &self.config, &self.clock)
    }
}

/// Builds the `/users/track` request for a single Event.
/// Returns `None` if neither the event nor its user attributes are configured for export.
#[instrument(
    level = "debug",
    name = "Compose Braze request",
    skip_all,
    fields(event = %event.name, uuid = ?event.uuid, team_id = ?event.team_id)
)]
pub fn compose<C: Clock + ?Sized>(
    event: &Event,
    config: &BrazeExportConfig,
    clock: &C,
) -> Result<Option<RequestDescriptor>, ComposerError> {
    let body = UsersTrackBody {
        attributes: build_attribute(event, config).into_iter().collect(),
        events: build_event_record(event, config, clock).into_iter().collect(),
    };

    if body.is_empty() {
        info!("BrazeComposer - No data to export to Braze for event [{}]", event.name);
        return Ok(None);
    }

    debug!(
        "BrazeComposer - Exporting {} attribute(s) and {} event(s) for event [{}]",
        body.attributes.len(),
        body.events.len(),
        event.name
    );

    let url = format!("{}{}", config.region.base_url(), USERS_TRACK_PATH);
    let body = serde_json::to_string(&body)?;
    Ok(Some(RequestDescriptor::json_post(url, &config.api_key, body)))
}

fn build_attribute(event: &Event, config: &BrazeExportConfig) -> Option<OutboundAttribute> {
    let should_import_attributes = config.import_user_attributes_in_all_events
        || config.events_to_export.contains(&event.name);
    if !should_import_attributes {
        return None;
    }

    let filtered_properties: Payload = event
        .set_properties()
        .map(|user_properties| {
            user_properties
                .iter()
                .filter(|(key, _)| config.user_properties_to_export.contains(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default();

    if filtered_properties.is_empty() {
        None
    } else {
        Some(OutboundAttribute::new(event.distinct_id.as_str(), filtered_properties))
    }
}

fn build_event_record<C: Clock + ?Sized>(
    event: &Event,
    config: &BrazeExportConfig,
    clock: &C,
) -> Option<OutboundEventRecord> {
    if !config.events_to_export.contains(&event.name) {
        return None;
    }

    let time = match &event.timestamp {
        Some(timestamp) => format_braze_time(timestamp),
        None => format_braze_time(&midnight_of_today(clock)),
    };

    Some(OutboundEventRecord {
        external_id: event.distinct_id.clone(),
        name: event.name.clone(),
        time,
        properties: event.properties_without_set(),
    })
}

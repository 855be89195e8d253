use beacon_common_api::Event;
use beacon_composer_braze::config::{BrazeAppConfig, BrazeExportConfig, YesNo};
use beacon_composer_braze::BrazeComposer;
use beacon_composer_common::{
    ComposerError, FixedClock, HttpMethod, RequestDescriptor, StatelessComposer,
};
use chrono::NaiveDate;
use maplit::btreemap;
use serde_json::{json, Value};

const ACCOUNT_CREATED_EVENT: &str = r#"{
    "event": "account created",
    "timestamp": "2023-06-16T00:00:00.00Z",
    "distinct_id": "test",
    "properties": {
        "$set": { "email": "test@posthog", "name": "Test User" },
        "is_a_demo_user": true
    }
}"#;

fn event_named(name: &str) -> Event {
    let mut event = Event::from_json(ACCOUNT_CREATED_EVENT).unwrap();
    event.name = name.to_owned();
    event
}

fn composer(app_config: BrazeAppConfig) -> BrazeComposer<FixedClock> {
    BrazeComposer::with_clock(
        BrazeExportConfig::try_from(app_config).unwrap(),
        FixedClock(NaiveDate::from_ymd_opt(2023, 6, 20).unwrap()),
    )
}

fn fixture_config() -> BrazeAppConfig {
    BrazeAppConfig {
        braze_endpoint: "US-03".to_owned(),
        api_key: "my-api-key".to_owned(),
        events_to_export: Some("account created".to_owned()),
        user_properties_to_export: Some("email,name".to_owned()),
        ..Default::default()
    }
}

fn body_of(request: &RequestDescriptor) -> Value {
    serde_json::from_str(&request.body).unwrap()
}

#[test]
fn should_export_attributes_and_event_of_an_allowed_event() {
    // Arrange
    let composer = composer(fixture_config());

    // Act
    let request = composer.compose(&event_named("account created")).unwrap().unwrap();

    // Assert
    assert_eq!("https://rest.iad-03.braze.com/users/track", request.url);
    assert_eq!(HttpMethod::Post, request.method);
    assert_eq!(
        btreemap![
            "Accept".to_owned() => "application/json".to_owned(),
            "Content-Type".to_owned() => "application/json".to_owned(),
            "Authorization".to_owned() => "Bearer my-api-key".to_owned(),
        ],
        request.headers
    );
    assert_eq!(
        json!({
            "attributes": [{
                "email": "test@posthog",
                "name": "Test User",
                "external_id": "test"
            }],
            "events": [{
                "properties": { "is_a_demo_user": true },
                "external_id": "test",
                "name": "account created",
                "time": "2023-06-16T00:00:00.00Z"
            }]
        }),
        body_of(&request)
    );
}

#[test]
fn should_export_only_attributes_of_identify_if_attributes_are_imported_in_all_events() {
    // Arrange
    let composer = composer(BrazeAppConfig {
        import_user_attributes_in_all_events: YesNo::Yes,
        ..fixture_config()
    });

    // Act
    let request = composer.compose(&event_named("$identify")).unwrap().unwrap();

    // Assert
    assert_eq!(
        json!({
            "attributes": [{
                "email": "test@posthog",
                "name": "Test User",
                "external_id": "test"
            }],
            "events": []
        }),
        body_of(&request)
    );
}

#[test]
fn should_export_nothing_if_event_is_not_allowed_and_attributes_are_not_imported_in_all_events() {
    // Arrange
    let composer = composer(BrazeAppConfig {
        import_user_attributes_in_all_events: YesNo::No,
        ..fixture_config()
    });

    // Act
    let result = composer.compose(&event_named("$identify"));

    // Assert
    assert_eq!(Ok(None), result);
}

#[test]
fn should_export_nothing_if_no_allowed_user_property_is_set() {
    // Arrange
    let composer = composer(BrazeAppConfig {
        events_to_export: Some("other event".to_owned()),
        user_properties_to_export: Some("phone".to_owned()),
        import_user_attributes_in_all_events: YesNo::Yes,
        ..fixture_config()
    });

    // Act
    let result = composer.compose(&event_named("account created"));

    // Assert
    assert_eq!(Ok(None), result);
}

#[test]
fn should_exclude_properties_not_in_the_allow_list() {
    // Arrange
    let composer = composer(fixture_config());
    let mut event = event_named("account created");
    event.properties.insert("$set".to_owned(), json!({ "email": "a", "name": "b", "extra": "c" }));

    // Act
    let request = composer.compose(&event).unwrap().unwrap();

    // Assert
    assert_eq!(
        json!([{ "email": "a", "name": "b", "external_id": "test" }]),
        body_of(&request)["attributes"]
    );
}

#[test]
fn should_match_event_names_exactly() {
    // Arrange
    let composer = composer(BrazeAppConfig {
        user_properties_to_export: None,
        ..fixture_config()
    });

    // Act
    let exact = composer.compose(&event_named("account created")).unwrap();
    let leading_space = composer.compose(&event_named(" account created")).unwrap();

    // Assert
    assert_eq!(1, body_of(&exact.unwrap())["events"].as_array().unwrap().len());
    assert!(leading_space.is_none());
}

#[test]
fn should_not_trim_the_configured_event_names() {
    // Arrange
    let composer = composer(BrazeAppConfig {
        events_to_export: Some("a, b".to_owned()),
        ..fixture_config()
    });

    // Assert
    assert!(composer.compose(&event_named("a")).unwrap().is_some());
    assert!(composer.compose(&event_named("b")).unwrap().is_none());
    assert!(composer.compose(&event_named(" b")).unwrap().is_some());
}

#[test]
fn should_never_send_set_in_event_properties() {
    // Arrange
    let composer = composer(fixture_config());
    let mut event = event_named("account created");
    event.properties.insert("nested".to_owned(), json!({ "deep": { "list": [1, "two", null] } }));

    // Act
    let request = composer.compose(&event).unwrap().unwrap();

    // Assert
    let properties = &body_of(&request)["events"][0]["properties"];
    assert!(properties.get("$set").is_none());
    assert_eq!(json!({ "deep": { "list": [1, "two", null] } }), properties["nested"]);
    assert_eq!(json!(true), properties["is_a_demo_user"]);
}

#[test]
fn should_use_the_region_base_url() {
    for (region, expected_url) in [
        ("EU-01", "https://rest.fra-01.braze.eu/users/track"),
        ("EU-02", "https://rest.fra-02.braze.eu/users/track"),
        ("US-01", "https://rest.iad-01.braze.com/users/track"),
        ("US-03", "https://rest.iad-03.braze.com/users/track"),
        ("US-08", "https://rest.iad-08.braze.com/users/track"),
    ] {
        // Arrange
        let composer =
            composer(BrazeAppConfig { braze_endpoint: region.to_owned(), ..fixture_config() });

        // Act
        let request = composer.compose(&event_named("account created")).unwrap().unwrap();

        // Assert
        assert_eq!(expected_url, request.url);
    }
}

#[test]
fn should_fail_fast_on_unknown_region() {
    // Arrange
    let app_config = BrazeAppConfig { braze_endpoint: "US-07".to_owned(), ..fixture_config() };

    // Act
    let result = BrazeComposer::new(&app_config);

    // Assert
    match result {
        Err(ComposerError::ConfigurationError { message }) => assert!(message.contains("US-07")),
        _ => panic!("expected ConfigurationError"),
    }
}

#[test]
fn should_use_midnight_of_the_clock_date_if_event_has_no_timestamp() {
    // Arrange
    let composer = composer(fixture_config());
    let mut event = event_named("account created");
    event.timestamp = None;

    // Act
    let request = composer.compose(&event).unwrap().unwrap();

    // Assert
    assert_eq!(json!("2023-06-20T00:00:00.00Z"), body_of(&request)["events"][0]["time"]);
}

#[test]
fn should_keep_milliseconds_of_the_event_timestamp() {
    // Arrange
    let composer = composer(fixture_config());
    let mut event = event_named("account created");
    event.timestamp = Some("2023-06-16T08:09:10.123Z".parse().unwrap());

    // Act
    let request = composer.compose(&event).unwrap().unwrap();

    // Assert
    assert_eq!(json!("2023-06-16T08:09:10.123Z"), body_of(&request)["events"][0]["time"]);
}

#[test]
fn should_not_let_user_properties_override_the_external_id() {
    // Arrange
    let composer = composer(BrazeAppConfig {
        user_properties_to_export: Some("email,external_id".to_owned()),
        ..fixture_config()
    });
    let mut event = event_named("account created");
    event
        .properties
        .insert("$set".to_owned(), json!({ "email": "a", "external_id": "someone-else" }));

    // Act
    let request = composer.compose(&event).unwrap().unwrap();

    // Assert
    assert_eq!(json!([{ "email": "a", "external_id": "test" }]), body_of(&request)["attributes"]);
}

#[test]
fn should_export_nothing_with_an_empty_configuration() {
    // Arrange
    let composer =
        composer(BrazeAppConfig { braze_endpoint: "US-01".to_owned(), ..Default::default() });

    // Act
    let result = composer.compose(&event_named("account created"));

    // Assert
    assert_eq!(Ok(None), result);
}

#[test]
fn should_produce_identical_output_on_repeated_calls() {
    // Arrange
    let composer = composer(fixture_config());
    let mut event = event_named("account created");
    event.timestamp = None;

    // Act
    let first = composer.compose(&event).unwrap();
    let second = composer.compose(&event).unwrap();

    // Assert
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn import_toggles_should_not_change_the_export() {
    // Arrange
    let plain = composer(fixture_config());
    let with_imports = composer(BrazeAppConfig {
        import_campaigns: YesNo::Yes,
        import_canvases: YesNo::Yes,
        import_custom_events: YesNo::Yes,
        import_feeds: YesNo::Yes,
        ..fixture_config()
    });
    let event = event_named("account created");

    // Assert
    assert_eq!(plain.compose(&event), with_imports.compose(&event));
}

#[test]
fn should_fall_back_to_midnight_for_malformed_timestamps() {
    for timestamp in [r#""""#, r#""2023-06-16 10:00:00""#] {
        // Arrange
        let composer = composer(fixture_config());
        let event = Event::from_json(&format!(
            r#"{{"event": "account created", "distinct_id": "test", "timestamp": {},
                "properties": {{ "$set": {{ "email": "test@posthog" }} }} }}"#,
            timestamp
        ))
        .unwrap();

        // Act
        let request = composer.compose(&event).unwrap().unwrap();

        // Assert
        let body = body_of(&request);
        assert_eq!(json!("2023-06-20T00:00:00.00Z"), body["events"][0]["time"]);
        assert_eq!(json!([{ "email": "test@posthog", "external_id": "test" }]), body["attributes"]);
    }
}

#[test]
fn should_keep_the_property_order_of_the_event() {
    // Arrange
    let composer = composer(fixture_config());
    let event = Event::from_json(
        r#"{"event": "account created", "distinct_id": "test", "properties": {
            "zeta": 1, "$set": { "name": "Test User", "email": "test@posthog" }, "alpha": 2
        }}"#,
    )
    .unwrap();

    // Act
    let request = composer.compose(&event).unwrap().unwrap();

    // Assert
    let position = |text: &str| request.body.find(text).unwrap();
    assert!(position(r#""name""#) < position(r#""email""#));
    assert!(position(r#""zeta""#) < position(r#""alpha""#));
}

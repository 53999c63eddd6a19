use availability_resolver::{
    AvailabilityError, AvailabilityResolver, FixedClock, ResolutionError, SlotStore,
    SupabaseSlotStore, TomlConfig,
};
use chrono::NaiveDate;
use httpmock::prelude::*;
use std::time::Duration;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
}

fn rows() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 101, "experience_id": "exp-42", "date": "2026-02-18",
            "start_time": "08:00:00", "end_time": "10:00:00",
            "max_participants": 10, "booked_participants": 10, "is_available": true
        },
        {
            "id": 102, "experience_id": "exp-42", "date": "2026-02-18",
            "start_time": "18:00:00", "end_time": "20:00:00",
            "max_participants": 5, "booked_participants": 2, "is_available": true
        },
        {
            "id": 103, "experience_id": "exp-42", "date": "2026-02-19",
            "start_time": "09:00:00", "end_time": "11:00:00",
            "max_participants": 5, "booked_participants": 5, "is_available": true
        }
    ])
}

#[tokio::test]
async fn test_query_sends_postgrest_filters() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/availability_slots")
            .header("apikey", "anon-key")
            .query_param("select", "*")
            .query_param("experience_id", "eq.exp-42")
            .query_param("is_available", "eq.true")
            .query_param("order", "date.asc,start_time.asc");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(rows());
    });

    let store = SupabaseSlotStore::new(server.base_url(), "anon-key").unwrap();
    let slots = store.query("exp-42", day(18), day(28)).await.unwrap();

    api_mock.assert();
    assert_eq!(slots.len(), 3);
    assert_eq!(slots[0].id, "101");
    assert_eq!(slots[1].spots_left(), 3);
    assert_eq!(slots[2].date, day(19));
}

#[tokio::test]
async fn test_query_sends_inclusive_date_bounds() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/availability_slots")
            .query_param("date", "gte.2026-02-18")
            .query_param("date", "lte.2026-03-04");
        then.status(200).json_body(serde_json::json!([]));
    });

    let store = SupabaseSlotStore::new(server.base_url(), "anon-key").unwrap();
    let slots = store
        .query("exp-42", day(18), NaiveDate::from_ymd_opt(2026, 3, 4).unwrap())
        .await
        .unwrap();

    api_mock.assert();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_error_status_becomes_store_error() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/rest/v1/availability_slots");
        then.status(401)
            .json_body(serde_json::json!({"message": "Invalid API key"}));
    });

    let store = SupabaseSlotStore::new(server.base_url(), "wrong-key").unwrap();
    let err = store.query("exp-42", day(18), day(28)).await.unwrap_err();

    api_mock.assert();
    match err {
        AvailabilityError::StoreStatusError { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_rows_are_serialization_errors() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/availability_slots");
        then.status(200).json_body(serde_json::json!([{"id": 1, "date": "soon"}]));
    });

    let store = SupabaseSlotStore::new(server.base_url(), "anon-key").unwrap();
    let err = store.query("exp-42", day(18), day(28)).await.unwrap_err();

    assert!(matches!(err, AvailabilityError::SerializationError(_)));
}

#[tokio::test]
async fn test_resolver_over_supabase_end_to_end() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/availability_slots")
            .query_param("experience_id", "eq.exp-42");
        then.status(200).json_body(rows());
    });

    let store = SupabaseSlotStore::new(server.base_url(), "anon-key").unwrap();
    let now = day(18).and_hms_opt(12, 0, 0).unwrap();
    let resolver = AvailabilityResolver::new(store, FixedClock::new(now));

    let groups = resolver.resolve_availability("exp-42", 14).await.unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label, "Wednesday, February 18");
    assert_eq!(groups[0].slots.len(), 1);
    assert_eq!(groups[0].slots[0].id, "102");
    assert_eq!(groups[0].slots[0].time_range(), "6:00 PM – 8:00 PM");
}

#[tokio::test]
async fn test_server_error_surfaces_as_fetch_failed() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/availability_slots");
        then.status(500).body("boom");
    });

    let store = SupabaseSlotStore::new(server.base_url(), "anon-key").unwrap();
    let now = day(18).and_hms_opt(12, 0, 0).unwrap();
    let resolver = AvailabilityResolver::new(store, FixedClock::new(now));

    let err = resolver.resolve_availability("exp-42", 14).await.unwrap_err();
    let ResolutionError::FetchFailed { source } = err;
    assert!(matches!(
        source,
        AvailabilityError::StoreStatusError { status: 500, .. }
    ));
}

#[tokio::test]
async fn test_slow_store_times_out() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/availability_slots");
        then.status(200)
            .delay(Duration::from_millis(1500))
            .json_body(serde_json::json!([]));
    });

    let store = SupabaseSlotStore::with_options(
        server.base_url(),
        "anon-key",
        "availability_slots",
        Duration::from_millis(200),
    )
    .unwrap();

    let err = store.query("exp-42", day(18), day(28)).await.unwrap_err();
    assert!(matches!(err, AvailabilityError::HttpError(_)));
}

#[tokio::test]
async fn test_store_from_toml_config() {
    let server = MockServer::start();

    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/experience_slots")
            .header("apikey", "toml-key");
        then.status(200).json_body(serde_json::json!([]));
    });

    let config = TomlConfig::from_toml_str(&format!(
        r#"
[store]
url = "{}"
api_key = "toml-key"
table = "experience_slots"
timeout_seconds = 5
"#,
        server.base_url()
    ))
    .unwrap();

    let store = SupabaseSlotStore::from_config(&config).unwrap();
    store.query("exp-42", day(18), day(28)).await.unwrap();

    api_mock.assert();
}

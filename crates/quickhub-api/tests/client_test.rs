// Integration tests for `HubClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quickhub_api::models::QuickAppFile;
use quickhub_api::{Error, HubClient, StaticProvider};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HubClient) {
    let server = MockServer::start().await;
    let host = server
        .uri()
        .strip_prefix("http://")
        .map_or_else(|| server.uri(), str::to_owned);
    let provider = StaticProvider::from_parts("http", host, "admin", "hunter2");
    let client = HubClient::with_client(reqwest::Client::new(), Arc::new(provider));
    (server, client)
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_by_interface() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": 42, "name": "Thermostat", "type": "com.fibaro.quickApp",
          "modified": 1720000000, "interfaces": ["quickApp"] },
        { "id": 43, "name": "Sensor", "type": "com.fibaro.quickApp",
          "interfaces": ["quickApp", "battery"] },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .and(query_param("interface", "quickApp"))
        .and(basic_auth("admin", "hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let devices = client.list_devices("quickApp").await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, Some(42));
    assert_eq!(devices[0].name.as_deref(), Some("Thermostat"));
    assert_eq!(devices[0].modified, Some(1_720_000_000));
    assert!(devices[1].has_interface("battery"));
}

#[tokio::test]
async fn test_list_devices_non_array_body_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "oops": true })))
        .mount(&server)
        .await;

    let devices = client.list_devices("quickApp").await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_get_device() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42, "name": "Thermostat", "type": "com.fibaro.quickApp",
            "interfaces": ["quickApp"]
        })))
        .mount(&server)
        .await;

    let device = client.get_device(42).await.unwrap();
    assert_eq!(device.id, Some(42));
    assert!(device.has_interface("quickApp"));
}

// ── Refresh states ──────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_states_passes_cursor_and_timeout() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/refreshStates"))
        .and(query_param("last", "17"))
        .and(query_param("timeout", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "last": 21,
            "events": [
                { "type": "DeviceRemovedEvent", "id": 5 },
                { "type": "CentralSceneEvent", "data": { "id": 6 } },
            ]
        })))
        .mount(&server)
        .await;

    let rs = client.refresh_states(17, 30).await.unwrap();
    assert_eq!(rs.last, Some(21));
    assert_eq!(rs.events.len(), 2);
    assert_eq!(rs.events[0].device_id(), Some(5));
}

#[tokio::test]
async fn test_refresh_states_tolerates_empty_body_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/refreshStates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let rs = client.refresh_states(0, 30).await.unwrap();
    assert_eq!(rs.last, None);
    assert!(rs.events.is_empty());
}

// ── QuickApp files ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_files_mixed_shapes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/quickApp/42/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "main", "isMain": true, "type": "lua" },
            "extra",
        ])))
        .mount(&server)
        .await;

    let files = client.list_files(42).await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].name(), "main");
    assert!(files[0].is_main());
    assert_eq!(files[1].name(), "extra");
}

#[tokio::test]
async fn test_get_file_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/quickApp/42/files/main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "main", "content": "function onInit() end", "isMain": true, "type": "lua"
        })))
        .mount(&server)
        .await;

    let file = client.get_file(42, "main").await.unwrap();
    assert_eq!(file.content, "function onInit() end");
    assert!(file.is_main);
}

#[tokio::test]
async fn test_get_file_bare_body_falls_back_to_content() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/quickApp/42/files/notes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("-- just lua"))
        .mount(&server)
        .await;

    let file = client.get_file(42, "notes").await.unwrap();
    assert_eq!(file.name, "notes");
    assert_eq!(file.content, "-- just lua");
}

#[tokio::test]
async fn test_create_file_accepts_201() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/quickApp/42/files/helper"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    client
        .create_file(42, &QuickAppFile::lua("helper", ""))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_file_rejects_bad_name_before_sending() {
    let (_server, client) = setup().await;

    let result = client.create_file(42, &QuickAppFile::lua("a b", "")).await;
    assert!(matches!(result, Err(Error::InvalidRequest(_))));
}

#[tokio::test]
async fn test_delete_file_rejects_204() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/quickApp/42/files/old"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = client.delete_file(42, "old").await;
    assert!(matches!(result, Err(Error::Api { status: 204, .. })));
}

#[tokio::test]
async fn test_rename_file_roundtrip() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/quickApp/42/files/lib"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "lib", "content": "return {}", "isMain": false, "type": "lua"
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/quickApp/42/files/lib"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.rename_file(42, "lib", "lib2").await.unwrap();
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_error_401_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_devices("quickApp").await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication, got: {result:?}"
    );
}

#[tokio::test]
async fn test_error_500_maps_to_api() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = client.get_device(1).await;
    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unparsable_body_maps_to_deserialization() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/devices/9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.get_device(9).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization, got: {result:?}"
    );
}

//! End-to-end tests: configuration to vehicle handle against a mock provider
//!
//! One wiremock server plays both the token endpoint and the fleet API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fleetlink_domain::{ChargeStatus, ClientCredentials, FleetError, StoredTokens, VehicleConfig};
use fleetlink_infra::VehicleFactory;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const VIN: &str = "WVWZZZ1JZXW000001";

fn config_for(server: &MockServer) -> VehicleConfig {
    let mut config = VehicleConfig::new(ClientCredentials::new("client-id", "client-secret"));
    config.title = "e-Golf".to_string();
    config.capacity = 35.8;
    config.vin = VIN.to_lowercase();
    config.api.base_url = server.uri();
    config.api.token_url = format!("{}/authentication", server.uri());
    config.api.timeout_seconds = 5;
    config
}

/// Token endpoint issuing `app-1`, `app-2`, ... on every app login
async fn mount_app_login(server: &MockServer) -> Arc<AtomicUsize> {
    let issued = Arc::new(AtomicUsize::new(0));
    let counter = issued.clone();
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_json(json!({
            "client_id": "client-id",
            "client_secret": "client-secret",
            "grant_type": "app"
        })))
        .respond_with(move |_: &Request| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": format!("app-{n}"), "expires_in": 3600}))
        })
        .mount(server)
        .await;
    issued
}

async fn mount_vehicles(server: &MockServer, scopes: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/v1/vehicles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": "v-other", "vin": "OTHERVIN0000000000", "scopes": ["read_vin"]},
                {"id": "v-1", "vin": VIN, "scopes": scopes}
            ]
        })))
        .mount(server)
        .await;
}

fn bulk_body() -> serde_json::Value {
    json!({
        "level": 72.5,
        "range": 210.9,
        "odometer": 15321.0,
        "charging": "NotCharging",
        "timestamp": 1_700_000_000_000_i64
    })
}

/// Validates the read_charge-only scenario end to end.
///
/// # Test Steps
/// 1. Connect with client credentials only (app flow) and a lowercase VIN
/// 2. Verify the handle exposes exactly the charge-state facet
/// 3. Read SoC, range and status and verify they cost one bulk call
#[tokio::test]
async fn test_app_flow_read_charge_vehicle() {
    let server = MockServer::start().await;
    let issued = mount_app_login(&server).await;
    mount_vehicles(&server, &["read_vin", "read_charge"]).await;
    Mock::given(method("GET"))
        .and(path("/v1/vehicles/v-1/bulk"))
        .and(header("authorization", "Bearer app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bulk_body()))
        .expect(1)
        .mount(&server)
        .await;

    let handle = VehicleFactory::connect(&config_for(&server)).await.expect("handle");

    assert_eq!(handle.identifier(), VIN);
    assert_eq!(handle.title(), "e-Golf");
    assert!(handle.odometer().is_none());
    assert!(handle.charge_control().is_none());

    assert!((handle.soc().await.unwrap() - 72.5).abs() < f64::EPSILON);
    assert_eq!(handle.range().await.unwrap(), 210);
    let status = handle.charge_state().expect("charge facet").status().await.unwrap();
    assert_eq!(status, ChargeStatus::Connected);

    assert_eq!(issued.load(Ordering::SeqCst), 1);
}

/// Validates that a stored token pair is refreshed before first use.
///
/// Assertions:
/// - the refresh grant carries the stored refresh token
/// - the refreshed access token is used for the listing
#[tokio::test]
async fn test_stored_tokens_use_refresh_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=stored-refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "refreshed",
            "refresh_token": "rotated",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vehicles"))
        .and(header("authorization", "Bearer refreshed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": "v-1", "vin": VIN, "scopes": ["read_odometer"]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.tokens = StoredTokens::new("stored-access", "stored-refresh");

    let handle = VehicleFactory::connect(&config).await.expect("handle");

    assert!(handle.odometer().is_some());
    assert!(handle.charge_state().is_none());
}

#[tokio::test]
async fn test_unauthorized_bulk_is_retried_once_with_new_token() {
    let server = MockServer::start().await;
    let issued = mount_app_login(&server).await;
    mount_vehicles(&server, &["read_charge"]).await;
    Mock::given(method("GET"))
        .and(path("/v1/vehicles/v-1/bulk"))
        .and(header("authorization", "Bearer app-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/vehicles/v-1/bulk"))
        .and(header("authorization", "Bearer app-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bulk_body()))
        .expect(1)
        .mount(&server)
        .await;

    let handle = VehicleFactory::connect(&config_for(&server)).await.expect("handle");

    assert_eq!(handle.range().await.unwrap(), 210);
    assert_eq!(issued.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_second_unauthorized_surfaces_auth_error() {
    let server = MockServer::start().await;
    let issued = mount_app_login(&server).await;
    mount_vehicles(&server, &["read_charge"]).await;
    Mock::given(method("GET"))
        .and(path("/v1/vehicles/v-1/bulk"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let handle = VehicleFactory::connect(&config_for(&server)).await.expect("handle");

    assert!(matches!(handle.soc().await, Err(FleetError::Auth(_))));
    // The failure is cached like a value for the rest of the TTL.
    assert!(matches!(handle.range().await, Err(FleetError::Auth(_))));
    assert_eq!(issued.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_share_one_bulk_call() {
    let server = MockServer::start().await;
    mount_app_login(&server).await;
    mount_vehicles(&server, &["read_charge", "read_odometer"]).await;
    Mock::given(method("GET"))
        .and(path("/v1/vehicles/v-1/bulk"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(bulk_body())
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let handle = Arc::new(VehicleFactory::connect(&config_for(&server)).await.expect("handle"));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let handle = handle.clone();
            tokio::spawn(async move { handle.soc().await })
        })
        .collect();

    for task in tasks {
        assert!((task.await.unwrap().unwrap() - 72.5).abs() < f64::EPSILON);
    }
    let odometer = handle.odometer().expect("odometer facet").odometer().await.unwrap();
    assert!((odometer - 15_321.0).abs() < f64::EPSILON);
    assert_eq!(handle.telemetry_stats().fetches, 1);
}

/// Validates charge control against the provider's action endpoints.
///
/// Assertions:
/// - start posts to `charge_start`
/// - a 405 answer on `charge_stop` counts as success
/// - a refused action is a control-action error
#[tokio::test]
async fn test_charge_control_actions() {
    let server = MockServer::start().await;
    mount_app_login(&server).await;
    mount_vehicles(&server, &["write_charge_start_stop"]).await;
    Mock::given(method("POST"))
        .and(path("/v1/vehicles/v-1/charge_start"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/vehicles/v-1/charge_stop"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;

    let handle = VehicleFactory::connect(&config_for(&server)).await.expect("handle");
    let control = handle.charge_control().expect("charge control facet");

    control.start_charge().await.expect("start accepted");
    control.stop_charge().await.expect("405 treated as success");

    server.reset().await;
    mount_app_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/vehicles/v-1/charge_start"))
        .respond_with(ResponseTemplate::new(400).set_body_string("vehicle asleep"))
        .mount(&server)
        .await;

    assert!(matches!(control.set_charging(true).await, Err(FleetError::ControlAction(_))));
}

#[tokio::test]
async fn test_unknown_vin_is_not_found() {
    let server = MockServer::start().await;
    mount_app_login(&server).await;
    mount_vehicles(&server, &["read_charge"]).await;

    let mut config = config_for(&server);
    config.vin = "NOT-ON-ACCOUNT".to_string();

    assert!(matches!(VehicleFactory::connect(&config).await, Err(FleetError::NotFound(_))));
}

#[tokio::test]
async fn test_missing_credentials_fail_before_any_request() {
    let server = MockServer::start().await;

    let mut config = config_for(&server);
    config.credentials.secret.clear();

    assert!(matches!(VehicleFactory::connect(&config).await, Err(FleetError::Config(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_app_login_fails_construction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "unknown client"
        })))
        .mount(&server)
        .await;

    match VehicleFactory::connect(&config_for(&server)).await {
        Err(FleetError::Auth(message)) => assert!(message.contains("invalid_client")),
        Err(other) => panic!("expected auth error, got {other:?}"),
        Ok(_) => panic!("expected auth error, got a handle"),
    }
}

#[tokio::test]
async fn test_empty_vin_with_several_vehicles_is_not_found() {
    let server = MockServer::start().await;
    mount_app_login(&server).await;
    mount_vehicles(&server, &["read_charge"]).await;

    let mut config = config_for(&server);
    config.vin.clear();

    assert!(matches!(VehicleFactory::connect(&config).await, Err(FleetError::NotFound(_))));
}

/// Validates that metrics the provider omits or nulls do not break the
/// baseline readings of a `read_charge` vehicle.
///
/// # Test Steps
/// 1. Serve a bulk body with `odometer: null`, then one without `odometer`
/// 2. Verify SoC, range and status decode from each
#[tokio::test]
async fn test_sparse_bulk_payload_keeps_baseline_readings() {
    let bodies = [
        json!({"level": 72.5, "range": 210, "odometer": null, "charging": "Charging"}),
        json!({"level": 72.5, "range": 210, "charging": "Charging"}),
    ];

    for body in bodies {
        let server = MockServer::start().await;
        mount_app_login(&server).await;
        mount_vehicles(&server, &["read_charge"]).await;
        Mock::given(method("GET"))
            .and(path("/v1/vehicles/v-1/bulk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let handle = VehicleFactory::connect(&config_for(&server)).await.expect("handle");

        assert!((handle.soc().await.expect("soc") - 72.5).abs() < f64::EPSILON);
        assert_eq!(handle.range().await.expect("range"), 210);
        let status = handle.charge_state().expect("charge state facet").status().await;
        assert_eq!(status, Ok(ChargeStatus::Charging));
    }
}

/// Validates that refused control actions are sent once and reported as
/// control-action errors whatever the status.
///
/// Assertions:
/// - a 503 on `charge_start` is not re-sent
/// - a 403 on `charge_stop` is a control-action error, not an auth error
#[tokio::test]
async fn test_refused_control_actions_are_sent_once() {
    let server = MockServer::start().await;
    mount_app_login(&server).await;
    mount_vehicles(&server, &["write_charge_start_stop"]).await;
    Mock::given(method("POST"))
        .and(path("/v1/vehicles/v-1/charge_start"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/vehicles/v-1/charge_stop"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let handle = VehicleFactory::connect(&config_for(&server)).await.expect("handle");
    let control = handle.charge_control().expect("charge control facet");

    assert!(matches!(control.start_charge().await, Err(FleetError::ControlAction(_))));
    assert!(matches!(control.stop_charge().await, Err(FleetError::ControlAction(_))));
}

#[tokio::test]
async fn test_unbounded_token_lifetime_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/authentication"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "app-1", "expires_in": i64::MAX})),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_vehicles(&server, &["read_charge"]).await;
    Mock::given(method("GET"))
        .and(path("/v1/vehicles/v-1/bulk"))
        .and(header("authorization", "Bearer app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bulk_body()))
        .mount(&server)
        .await;

    let handle = VehicleFactory::connect(&config_for(&server)).await.expect("handle");

    assert!((handle.soc().await.expect("soc") - 72.5).abs() < f64::EPSILON);
}

// Integration tests for the `Console` lifecycle against a mock server.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdeck_core::model::{ComparisonStatus, EntityId, Severity};
use opsdeck_core::{
    AuthMethod, ConnectionState, Console, ConsoleConfig, ConsoleFlag, ConsoleFlags, CoreError,
    MarkRead, view,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn config_for(server: &MockServer) -> ConsoleConfig {
    ConsoleConfig {
        url: server.uri().parse().unwrap(),
        auth: AuthMethod::Token(SecretString::from("test-token")),
        timeout: Duration::from_secs(5),
        refresh_interval_secs: 0,
        ..ConsoleConfig::default()
    }
}

async fn mount_ok(server: &MockServer, route: &str, body: &Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount the status probe plus all four collection endpoints.
async fn mount_console(server: &MockServer) {
    mount_ok(server, "/api/status", &status_body()).await;
    mount_ok(server, "/api/notifications", &sample_notifications()).await;
    mount_ok(server, "/api/contracts", &sample_contracts()).await;
    mount_ok(server, "/api/security-rules", &sample_rules()).await;
    mount_ok(server, "/api/comparisons", &sample_comparisons()).await;
}

fn status_body() -> Value {
    json!({ "version": "3.4.0", "healthy": true })
}

fn sample_notifications() -> Value {
    json!([
        {
            "id": "n-1",
            "title": "Disk usage above 90%",
            "body": "Volume /data on worker-3",
            "severity": "WARNING",
            "createdAt": "2024-05-01T10:00:00Z",
            "read": false
        },
        {
            "id": "n-2",
            "title": "Nightly import finished",
            "severity": "INFO",
            "read": true
        }
    ])
}

fn sample_contracts() -> Value {
    json!([
        {
            "id": "c-1",
            "name": "Data export",
            "partner": "Acme",
            "version": "2.0",
            "status": "ACTIVE",
            "canDelete": false
        }
    ])
}

fn sample_rules() -> Value {
    json!([
        {
            "id": "r-1",
            "name": "Block legacy TLS",
            "enabled": true,
            "builtin": true
        }
    ])
}

fn sample_comparisons() -> Value {
    json!([
        {
            "id": "cmp-1",
            "sourceSystem": "billing",
            "targetSystem": "ledger",
            "status": "PENDING",
            "mismatches": 0,
            "ranAt": null
        }
    ])
}

// ── Lifecycle ───────────────────────────────────────────────────────

#[tokio::test]
async fn connect_loads_every_collection() {
    let server = MockServer::start().await;
    mount_console(&server).await;

    let console = Console::new(config_for(&server));
    assert_eq!(console.state(), ConnectionState::Disconnected);

    console.connect().await.unwrap();
    assert_eq!(console.state(), ConnectionState::Connected);

    let store = console.store();
    assert_eq!(store.notification_count(), 2);
    assert_eq!(store.contract_count(), 1);
    assert_eq!(store.security_rule_count(), 1);
    assert_eq!(store.comparison_count(), 1);
    assert!(store.last_refresh().is_some());

    let first = store.notifications_snapshot()[0].clone();
    assert_eq!(first.severity, Severity::Warning);
    assert!(!first.read);

    console.disconnect().await;
}

#[tokio::test]
async fn connect_failure_marks_the_console_failed() {
    let server = MockServer::start().await;
    mount_ok(&server, "/api/status", &status_body()).await;
    mount_ok(&server, "/api/contracts", &sample_contracts()).await;
    mount_ok(&server, "/api/security-rules", &sample_rules()).await;
    mount_ok(&server, "/api/comparisons", &sample_comparisons()).await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let console = Console::new(config_for(&server));

    assert!(console.connect().await.is_err());
    assert_eq!(console.state(), ConnectionState::Failed);
    assert!(matches!(console.syncs(), Err(CoreError::Disconnected)));

    // Collections that did load before the failure are dropped again.
    assert_eq!(console.store().contract_count(), 0);
    assert_eq!(console.store().comparison_count(), 0);
}

#[tokio::test]
async fn reconnect_after_disconnect_reloads_the_store() {
    let server = MockServer::start().await;
    mount_console(&server).await;

    let console = Console::new(config_for(&server));
    console.connect().await.unwrap();
    console.disconnect().await;
    assert_eq!(console.store().notification_count(), 0);

    console.connect().await.unwrap();
    assert_eq!(console.state(), ConnectionState::Connected);
    assert_eq!(console.store().notification_count(), 2);
    assert!(console.syncs().is_ok());

    console.disconnect().await;
}

#[tokio::test]
async fn disconnect_clears_the_store() {
    let server = MockServer::start().await;
    mount_console(&server).await;

    let console = Console::new(config_for(&server));
    console.connect().await.unwrap();
    assert_eq!(console.store().notification_count(), 2);

    console.disconnect().await;

    assert_eq!(console.state(), ConnectionState::Disconnected);
    assert_eq!(console.store().notification_count(), 0);
    assert_eq!(console.store().contract_count(), 0);
    assert!(matches!(console.syncs(), Err(CoreError::Disconnected)));
}

#[tokio::test]
async fn session_auth_logs_in_on_connect_and_out_on_disconnect() {
    let server = MockServer::start().await;
    mount_console(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "username": "ops-admin",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "ops-admin",
            "roles": ["admin"]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.auth = AuthMethod::Session {
        username: "ops-admin".into(),
        password: SecretString::from("hunter2"),
    };

    let console = Console::new(config);
    console.connect().await.unwrap();
    assert_eq!(console.state(), ConnectionState::Connected);

    // `.expect(1)` on the login/logout mocks verifies both on server drop.
    console.disconnect().await;
}

// ── Mutations through the coordinators ──────────────────────────────

#[tokio::test]
async fn mark_read_flows_through_the_store() {
    let server = MockServer::start().await;
    mount_console(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/notifications/n-1/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "n-1",
            "title": "Disk usage above 90%",
            "body": "Volume /data on worker-3",
            "severity": "WARNING",
            "createdAt": "2024-05-01T10:00:00Z",
            "read": true
        })))
        .mount(&server)
        .await;

    let console = Console::new(config_for(&server));
    console.connect().await.unwrap();

    let syncs = console.syncs().unwrap();
    let updated = syncs
        .notifications
        .toggle(&EntityId::from("n-1"), &MarkRead)
        .await
        .unwrap();
    assert!(updated.read);

    let stored = console
        .store()
        .notification_by_id(&EntityId::from("n-1"))
        .unwrap();
    assert!(stored.read);
    // The updated entry keeps its position.
    assert_eq!(console.store().notifications_snapshot()[0].id.as_str(), "n-1");

    console.disconnect().await;
}

#[tokio::test]
async fn refresh_replaces_collections_with_server_state() {
    let server = MockServer::start().await;
    mount_ok(&server, "/api/status", &status_body()).await;
    mount_ok(&server, "/api/contracts", &sample_contracts()).await;
    mount_ok(&server, "/api/security-rules", &sample_rules()).await;
    mount_ok(&server, "/api/comparisons", &sample_comparisons()).await;

    // The first list call sees one notification, later calls see two.
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "n-1", "title": "One", "severity": "INFO", "read": false }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "n-1", "title": "One", "severity": "INFO", "read": false },
            { "id": "n-3", "title": "Two", "severity": "CRITICAL", "read": false }
        ])))
        .mount(&server)
        .await;

    let console = Console::new(config_for(&server));
    console.connect().await.unwrap();
    assert_eq!(console.store().notification_count(), 1);

    console.refresh().await.unwrap();

    assert_eq!(console.store().notification_count(), 2);
    let snapshot = console.store().notifications_snapshot();
    let ids: Vec<&str> = snapshot.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["n-1", "n-3"]);

    console.disconnect().await;
}

#[tokio::test]
async fn comparison_detail_folds_the_fetched_run_into_the_store() {
    let server = MockServer::start().await;
    mount_console(&server).await;
    mount_ok(
        &server,
        "/api/comparisons/cmp-1",
        &json!({
            "id": "cmp-1",
            "sourceSystem": "billing",
            "targetSystem": "ledger",
            "status": "SUCCEEDED",
            "mismatches": 3,
            "ranAt": "2024-05-01T10:00:00Z"
        }),
    )
    .await;

    let console = Console::new(config_for(&server));
    console.connect().await.unwrap();

    let detail = console
        .comparison_detail(&EntityId::from("cmp-1"))
        .await
        .unwrap();
    assert_eq!(detail.status, ComparisonStatus::Succeeded);
    assert_eq!(detail.mismatches, 3);

    let stored = console
        .store()
        .comparison_by_id(&EntityId::from("cmp-1"))
        .unwrap();
    assert_eq!(stored.status, ComparisonStatus::Succeeded);
    assert!(stored.ran_at.is_some());

    console.disconnect().await;
}

// ── One-shot mode and flags ─────────────────────────────────────────

#[tokio::test]
async fn oneshot_runs_the_closure_against_a_connected_console() {
    let server = MockServer::start().await;
    mount_console(&server).await;

    let unread = Console::oneshot(config_for(&server), |console| async move {
        Ok(view::unread_count(
            &console.store().notifications_snapshot(),
        ))
    })
    .await
    .unwrap();

    assert_eq!(unread, 1);
}

#[test]
fn flags_come_from_the_config() {
    let config = ConsoleConfig {
        flags: ConsoleFlags {
            contract_editing: false,
            ..ConsoleFlags::default()
        },
        ..ConsoleConfig::default()
    };

    let console = Console::new(config);
    assert!(!console.flags().is_enabled(ConsoleFlag::ContractEditing));
    assert!(console.flags().is_enabled(ConsoleFlag::SecurityRules));
}

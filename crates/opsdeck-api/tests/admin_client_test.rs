// Integration tests for `AdminClient` using wiremock.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use opsdeck_api::types::{
    ComparisonRunRequest, ContractWriteRequest, NotificationResponse, SecurityRuleWriteRequest,
};
use opsdeck_api::{AdminClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AdminClient) {
    let server = MockServer::start().await;
    let client = AdminClient::from_token(
        &server.uri(),
        &SecretString::from("test-token"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

async fn setup_session() -> (MockServer, AdminClient) {
    let server = MockServer::start().await;
    let client = AdminClient::for_session(&server.uri(), &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_notifications_sends_bearer_token() {
    let (server, client) = setup().await;

    let body = json!([
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
    ]);

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let items = client.list_notifications().await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "n-1");
    assert_eq!(items[0].severity, "WARNING");
    assert!(!items[0].read);
    // `body` is optional on the wire and defaults to empty
    assert_eq!(items[1].body, "");
    assert!(items[1].read);
}

#[tokio::test]
async fn test_mark_notification_read() {
    let (server, client) = setup().await;

    let body = json!({
        "id": "n-1",
        "title": "Disk usage above 90%",
        "severity": "WARNING",
        "read": true
    });

    Mock::given(method("PUT"))
        .and(path("/api/notifications/n-1/read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let updated: NotificationResponse = client.mark_notification_read("n-1").await.unwrap();

    assert_eq!(updated.id, "n-1");
    assert!(updated.read);
}

#[tokio::test]
async fn test_create_contract_sends_camel_case_body() {
    let (server, client) = setup().await;

    let req = ContractWriteRequest {
        name: "Data export".into(),
        partner: "Acme".into(),
        description: None,
        version: "2.0".into(),
        status: "DRAFT".into(),
    };

    // `description: None` must be omitted, not serialized as null
    let expected_body = json!({
        "name": "Data export",
        "partner": "Acme",
        "version": "2.0",
        "status": "DRAFT"
    });

    let response_body = json!({
        "id": "c-42",
        "name": "Data export",
        "partner": "Acme",
        "description": null,
        "version": "2.0",
        "status": "DRAFT",
        "updatedAt": "2024-05-01T10:00:00Z",
        "canDelete": true
    });

    Mock::given(method("POST"))
        .and(path("/api/contracts"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(201).set_body_json(&response_body))
        .mount(&server)
        .await;

    let created = client.create_contract(&req).await.unwrap();

    assert_eq!(created.id, "c-42");
    assert_eq!(created.status, "DRAFT");
    assert!(created.can_delete);
}

#[tokio::test]
async fn test_update_contract() {
    let (server, client) = setup().await;

    let req = ContractWriteRequest {
        name: "Data export".into(),
        partner: "Acme".into(),
        description: Some("Quarterly exports".into()),
        version: "2.1".into(),
        status: "ACTIVE".into(),
    };

    let response_body = json!({
        "id": "c-42",
        "name": "Data export",
        "partner": "Acme",
        "description": "Quarterly exports",
        "version": "2.1",
        "status": "ACTIVE"
    });

    Mock::given(method("PUT"))
        .and(path("/api/contracts/c-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
        .mount(&server)
        .await;

    let updated = client.update_contract("c-42", &req).await.unwrap();

    assert_eq!(updated.version, "2.1");
    assert_eq!(updated.status, "ACTIVE");
}

#[tokio::test]
async fn test_set_security_rule_enabled() {
    let (server, client) = setup().await;

    let response_body = json!({
        "id": "r-7",
        "name": "Block legacy TLS",
        "description": null,
        "enabled": false,
        "builtin": true
    });

    Mock::given(method("PUT"))
        .and(path("/api/security-rules/r-7/enabled"))
        .and(body_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
        .mount(&server)
        .await;

    let rule = client.set_security_rule_enabled("r-7", false).await.unwrap();

    assert!(!rule.enabled);
    assert!(rule.builtin);
}

#[tokio::test]
async fn test_create_security_rule() {
    let (server, client) = setup().await;

    let req = SecurityRuleWriteRequest {
        name: "Deny exports".into(),
        description: None,
        enabled: true,
    };

    let response_body = json!({
        "id": "r-9",
        "name": "Deny exports",
        "description": null,
        "enabled": true,
        "builtin": false
    });

    Mock::given(method("POST"))
        .and(path("/api/security-rules"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&response_body))
        .mount(&server)
        .await;

    let rule = client.create_security_rule(&req).await.unwrap();

    assert_eq!(rule.id, "r-9");
    assert!(!rule.builtin);
}

#[tokio::test]
async fn test_run_comparison() {
    let (server, client) = setup().await;

    let req = ComparisonRunRequest {
        source_system: "billing".into(),
        target_system: "ledger".into(),
    };

    let response_body = json!({
        "id": "cmp-3",
        "sourceSystem": "billing",
        "targetSystem": "ledger",
        "status": "PENDING",
        "mismatches": 0,
        "ranAt": null
    });

    Mock::given(method("POST"))
        .and(path("/api/comparisons"))
        .and(body_json(json!({
            "sourceSystem": "billing",
            "targetSystem": "ledger"
        })))
        .respond_with(ResponseTemplate::new(202).set_body_json(&response_body))
        .mount(&server)
        .await;

    let run = client.run_comparison(&req).await.unwrap();

    assert_eq!(run.id, "cmp-3");
    assert_eq!(run.status, "PENDING");
}

#[tokio::test]
async fn test_delete_notification_no_content() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/notifications/n-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.delete_notification("n-1").await.unwrap();
}

#[tokio::test]
async fn test_base_url_with_api_suffix_is_not_doubled() {
    let server = MockServer::start().await;
    let client = AdminClient::from_token(
        &format!("{}/api", server.uri()),
        &SecretString::from("test-token"),
        &TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "version": "3.4.0", "healthy": true })),
        )
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();
    assert_eq!(status.version, "3.4.0");
    assert!(status.healthy);
}

// ── Auth tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup_session().await;

    let response_body = json!({
        "username": "ops-admin",
        "roles": ["admin"]
    });

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({
            "username": "ops-admin",
            "password": "hunter2"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
        .mount(&server)
        .await;

    let session = client
        .login("ops-admin", &SecretString::from("hunter2"))
        .await
        .unwrap();

    assert_eq!(session.username, "ops-admin");
    assert_eq!(session.roles, vec!["admin".to_owned()]);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let (server, client) = setup_session().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "account locked" })),
        )
        .mount(&server)
        .await;

    let result = client.login("ops-admin", &SecretString::from("wrong")).await;

    match result {
        Err(Error::Authentication { ref message }) => assert_eq!(message, "account locked"),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_logout() {
    let (server, client) = setup_session().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_401_token_client() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_notifications().await;

    assert!(
        matches!(result, Err(Error::InvalidToken)),
        "expected InvalidToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_error_401_session_client_means_expired() {
    let (server, client) = setup_session().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.list_contracts().await;

    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_error_404_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/comparisons/cmp-999"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })),
        )
        .mount(&server)
        .await;

    let result = client.get_comparison("cmp-999").await;

    match result {
        Err(Error::Server {
            status,
            ref message,
            ..
        }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not found");
        }
        other => panic!("expected Server error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_422_with_code() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/contracts"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Version must not be empty",
            "code": "VALIDATION_ERROR"
        })))
        .mount(&server)
        .await;

    let req = ContractWriteRequest {
        name: "Bad".into(),
        partner: "Acme".into(),
        description: None,
        version: String::new(),
        status: "DRAFT".into(),
    };

    let result = client.create_contract(&req).await;

    match result {
        Err(Error::Server {
            status,
            ref message,
            ref code,
        }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "Version must not be empty");
            assert_eq!(code.as_deref(), Some("VALIDATION_ERROR"));
        }
        other => panic!("expected Server 422 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_500_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.list_security_rules().await;

    match result {
        Err(Error::Server {
            status, ref code, ..
        }) => {
            assert_eq!(status, 500);
            assert!(code.is_none());
        }
        other => panic!("expected Server 500 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let result = client.list_notifications().await;

    match result {
        Err(Error::Deserialization { ref message, .. }) => {
            assert!(message.contains("body preview"), "message: {message}");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

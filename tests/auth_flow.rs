use std::sync::Arc;

use dispatch_admin::auth::{
    FileStorage, LoginFlow, LoginState, MemoryStorage, SessionStorage, SessionStore, ACCESS_DENIED_MESSAGE,
    NETWORK_ERROR_MESSAGE,
};
use dispatch_admin::{ClientOptions, DispatchClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHONE: &str = "+447123456789";

fn flow_for(server_uri: &str) -> (LoginFlow, Arc<SessionStore>) {
    let store = Arc::new(SessionStore::new(MemoryStorage::new(), "admin-user"));
    let options = ClientOptions::default().with_base_url(server_uri);
    let client = DispatchClient::with_session_store(options, store.clone());
    (LoginFlow::new(client), store)
}

async fn mount_otp_sent(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "phoneNumber": PHONE })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "message": "sent"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_request_otp_moves_to_pending() {
    let mock_server = MockServer::start().await;
    mount_otp_sent(&mock_server).await;

    let (mut flow, _) = flow_for(&mock_server.uri());
    let outcome = flow.request_otp(PHONE).await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "sent");
    assert_eq!(
        flow.state(),
        &LoginState::OtpPending {
            phone_number: PHONE.to_string()
        }
    );
    assert_eq!(flow.notice(), Some("sent"));
}

#[tokio::test]
async fn test_non_admin_is_denied_and_not_persisted() {
    let mock_server = MockServer::start().await;
    mount_otp_sent(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .and(body_json(json!({ "phoneNumber": PHONE, "otp": "000000" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "token": "rider-token",
            "data": { "_id": "u1", "isAdmin": false }
        })))
        .mount(&mock_server)
        .await;

    let (mut flow, store) = flow_for(&mock_server.uri());
    flow.request_otp(PHONE).await;
    let outcome = flow.verify_otp("000000").await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, ACCESS_DENIED_MESSAGE);
    assert_eq!(flow.state(), &LoginState::Anonymous);
    assert_eq!(flow.error(), Some(ACCESS_DENIED_MESSAGE));
    assert!(store.current().is_none());
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_admin_login_is_persisted() {
    let mock_server = MockServer::start().await;
    mount_otp_sent(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Welcome back",
            "data": {
                "token": "admin-token",
                "user": {
                    "_id": "a1",
                    "fullName": "Ross Admin",
                    "phoneNumber": PHONE,
                    "isAdmin": "true"
                }
            }
        })))
        .mount(&mock_server)
        .await;

    let (mut flow, store) = flow_for(&mock_server.uri());
    flow.request_otp(PHONE).await;
    let outcome = flow.verify_otp("123456").await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "Welcome back");
    assert!(flow.state().is_authenticated());

    let session = store.load().expect("session persisted");
    assert_eq!(session.id, "a1");
    assert_eq!(session.name, "Ross Admin");
    assert_eq!(session.token.as_deref(), Some("admin-token"));

    flow.logout();
    assert_eq!(flow.state(), &LoginState::Anonymous);
    assert!(store.load().is_none());
}

#[tokio::test]
async fn test_wrong_code_stays_pending() {
    let mock_server = MockServer::start().await;
    mount_otp_sent(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": false,
            "message": "OTP expired"
        })))
        .mount(&mock_server)
        .await;

    let (mut flow, _) = flow_for(&mock_server.uri());
    flow.request_otp(PHONE).await;
    let outcome = flow.verify_otp("654321").await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "OTP expired");
    assert!(matches!(flow.state(), LoginState::OtpPending { .. }));
}

#[tokio::test]
async fn test_malformed_code_is_rejected_locally() {
    let mock_server = MockServer::start().await;
    mount_otp_sent(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (mut flow, _) = flow_for(&mock_server.uri());
    flow.request_otp(PHONE).await;

    for code in ["12345", "1234567", "12a456", ""] {
        let outcome = flow.verify_otp(code).await;
        assert!(!outcome.success, "{:?} should be rejected", code);
    }
    assert!(matches!(flow.state(), LoginState::OtpPending { .. }));
}

#[tokio::test]
async fn test_change_phone_number_resets() {
    let mock_server = MockServer::start().await;
    mount_otp_sent(&mock_server).await;

    let (mut flow, _) = flow_for(&mock_server.uri());
    flow.request_otp(PHONE).await;
    flow.change_phone_number();

    assert_eq!(flow.state(), &LoginState::Anonymous);
    assert_eq!(flow.otp(), "");
    assert_eq!(flow.notice(), None);
    assert_eq!(flow.error(), None);
}

#[tokio::test]
async fn test_resend_otp_uses_pending_number() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "phoneNumber": PHONE })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": true })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let (mut flow, _) = flow_for(&mock_server.uri());
    flow.request_otp(PHONE).await;
    let outcome = flow.resend_otp().await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "OTP sent successfully");
    assert!(matches!(flow.state(), LoginState::OtpPending { .. }));
}

#[tokio::test]
async fn test_network_failure_is_reported() {
    let (mut flow, _) = flow_for("http://127.0.0.1:1");
    let outcome = flow.request_otp(PHONE).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, NETWORK_ERROR_MESSAGE);
    assert_eq!(flow.state(), &LoginState::Anonymous);
}

#[tokio::test]
async fn test_password_login_requires_admin() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "token": "t",
            "user": { "id": "a2", "email": "ops@example.com", "role": "admin" }
        })))
        .mount(&mock_server)
        .await;

    let (mut flow, store) = flow_for(&mock_server.uri());
    let outcome = flow.login_with_password("ops@example.com", "hunter2").await;

    assert!(outcome.success);
    let session = store.current().expect("session");
    assert_eq!(session.name, "ops@example.com");
    assert_eq!(session.token.as_deref(), Some("t"));
}

#[tokio::test]
async fn test_numeric_status_otp_response_is_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "message": "sent"
        })))
        .mount(&mock_server)
        .await;

    let (mut flow, _) = flow_for(&mock_server.uri());
    let outcome = flow.request_otp(PHONE).await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "sent");
    assert!(matches!(flow.state(), LoginState::OtpPending { .. }));
    assert_eq!(flow.error(), None);
}

#[tokio::test]
async fn test_persisted_session_is_restored_at_startup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ride/all-rider-rides"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    storage
        .set(
            "admin-user",
            &json!({
                "id": "a1",
                "email": "ops@example.com",
                "name": "Ops Admin",
                "role": "admin",
                "contactNumber": PHONE,
                "address": "",
                "token": "stored-token"
            })
            .to_string(),
        )
        .unwrap();

    let store = Arc::new(SessionStore::new(storage, "admin-user"));
    let options = ClientOptions::default().with_base_url(&mock_server.uri());
    let client = DispatchClient::with_session_store(options, store);

    let report = client.dashboard_stats().await;
    assert!(report.status);

    let flow = LoginFlow::new(client);
    match flow.state() {
        LoginState::Authenticated(session) => {
            assert_eq!(session.id, "a1");
            assert_eq!(session.token.as_deref(), Some("stored-token"));
        }
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test]
async fn test_corrupted_session_file_is_removed() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let file = storage.path_for("admin-user");
    std::fs::write(&file, "not json at all").unwrap();

    let store = Arc::new(SessionStore::new(storage, "admin-user"));
    assert!(store.load().is_none());
    assert!(!file.exists());

    let client = DispatchClient::with_session_store(ClientOptions::default(), store);
    let flow = LoginFlow::new(client);
    assert_eq!(flow.state(), &LoginState::Anonymous);
}

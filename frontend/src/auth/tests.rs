use super::*;
use crate::api::tests::{CSRF_BODY, MockTransport};
use crate::error::MSG_LOGIN_FALLBACK;
use metro_shared::{ApiRequest, CSRF_TOKEN_PATH, HEADER_CSRF_TOKEN};
use std::cell::RefCell;

fn credentials() -> LoginRequest {
    LoginRequest {
        email: "admin@metro.example".into(),
        password: "secret".into(),
    }
}

fn login_body(role: &str) -> String {
    format!(
        r#"{{"meta":{{"status":200}},"data":{{"staff":{{"id":"7","username":"zhang","email":"admin@metro.example","role":"{role}"}}}}}}"#
    )
}

fn with_login_response(
    transport: MockTransport,
    role: &str,
) -> (MetroApi<MockTransport>, RefCell<Session>) {
    transport.respond(LoginRequest::PATH, 200, &login_body(role));
    let api = MetroApi::new(transport);
    let store = RefCell::new(Session::new());
    (api, store)
}

// =========================================================
// Login
// =========================================================

#[tokio::test]
async fn admin_login_lands_on_admin_dashboard() {
    let transport = MockTransport::new();
    transport.respond(CSRF_TOKEN_PATH, 200, CSRF_BODY);
    let (api, store) = with_login_response(transport, "ADMIN");

    let landing = AuthFlow::new(&api, &store)
        .login(&credentials())
        .await
        .unwrap();

    assert_eq!(landing, AppRoute::AdminDashboard);
    let session = store.snapshot();
    assert!(session.is_authenticated());
    assert_eq!(session.role(), Role::Admin);
    assert_eq!(session.user().unwrap().username, "zhang");

    let sent = api.transport().last_request(LoginRequest::PATH).unwrap();
    assert_eq!(sent.header(HEADER_CSRF_TOKEN), Some("csrf-123"));
}

#[tokio::test]
async fn landing_follows_role() {
    for (role, expected) in [
        ("MASTER_ADMIN", AppRoute::AdminDashboard),
        ("OPERATOR", AppRoute::OperatorDashboard),
        ("TICKET_AGENT", AppRoute::TicketAgentDashboard),
        ("PASSENGER", AppRoute::Login),
    ] {
        let transport = MockTransport::new();
        transport.respond(CSRF_TOKEN_PATH, 200, CSRF_BODY);
        let (api, store) = with_login_response(transport, role);

        let landing = AuthFlow::new(&api, &store)
            .login(&credentials())
            .await
            .unwrap();
        assert_eq!(landing, expected, "role {role}");
    }
}

#[tokio::test]
async fn login_proceeds_without_token_when_fetch_fails() {
    let transport = MockTransport::new();
    transport.fail(CSRF_TOKEN_PATH, ApiError::Network("offline".into()));
    let (api, store) = with_login_response(transport, "OPERATOR");

    let landing = AuthFlow::new(&api, &store)
        .login(&credentials())
        .await
        .unwrap();

    assert_eq!(landing, AppRoute::OperatorDashboard);
    let sent = api.transport().last_request(LoginRequest::PATH).unwrap();
    assert!(sent.header(HEADER_CSRF_TOKEN).is_none());
}

#[tokio::test]
async fn rejected_login_keeps_session_anonymous() {
    let transport = MockTransport::new();
    transport
        .respond(CSRF_TOKEN_PATH, 200, CSRF_BODY)
        .respond(
            LoginRequest::PATH,
            200,
            r#"{"meta":{"status":401,"message":"密码错误"}}"#,
        );
    let api = MetroApi::new(transport);
    let store = RefCell::new(Session::new());

    let err = AuthFlow::new(&api, &store)
        .login(&credentials())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "密码错误");
    let session = store.snapshot();
    assert!(!session.is_authenticated());
    assert_eq!(session.anti_forgery_token(), Some("csrf-123"));
}

#[tokio::test]
async fn rejected_login_without_message_uses_default_text() {
    let transport = MockTransport::new();
    transport
        .respond(CSRF_TOKEN_PATH, 200, CSRF_BODY)
        .respond(LoginRequest::PATH, 401, r#"{"meta":{"status":401}}"#);
    let api = MetroApi::new(transport);
    let store = RefCell::new(Session::new());

    let err = AuthFlow::new(&api, &store)
        .login(&credentials())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), MSG_LOGIN_FALLBACK);
    assert!(!store.snapshot().is_authenticated());
}

#[tokio::test]
async fn success_without_staff_is_an_error() {
    let transport = MockTransport::new();
    transport
        .respond(CSRF_TOKEN_PATH, 200, CSRF_BODY)
        .respond(LoginRequest::PATH, 200, r#"{"meta":{"status":200},"data":{}}"#);
    let api = MetroApi::new(transport);
    let store = RefCell::new(Session::new());

    let err = AuthFlow::new(&api, &store)
        .login(&credentials())
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::Session(SessionError::MissingUser));
    assert!(!store.snapshot().is_authenticated());
}

#[tokio::test]
async fn server_fault_during_login_records_error_code() {
    let transport = MockTransport::new();
    transport
        .respond(CSRF_TOKEN_PATH, 200, CSRF_BODY)
        .respond(LoginRequest::PATH, 500, r#"{"meta":{"status":500}}"#);
    let api = MetroApi::new(transport);
    let store = RefCell::new(Session::new());

    let err = AuthFlow::new(&api, &store)
        .login(&credentials())
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::Api(ApiError::ServerFault { code: 500 }));
    let session = store.snapshot();
    assert_eq!(session.last_error_code(), Some(500));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn gateway_page_during_login_records_error_code() {
    let transport = MockTransport::new();
    transport
        .respond(CSRF_TOKEN_PATH, 200, CSRF_BODY)
        .respond(LoginRequest::PATH, 502, "<html>Bad Gateway</html>");
    let api = MetroApi::new(transport);
    let store = RefCell::new(Session::new());

    let err = AuthFlow::new(&api, &store)
        .login(&credentials())
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::Api(ApiError::ServerFault { code: 502 }));
    let session = store.snapshot();
    assert_eq!(session.last_error_code(), Some(502));
    assert!(!session.is_authenticated());
}

// =========================================================
// OAuth
// =========================================================

#[tokio::test]
async fn oauth_callback_establishes_session() {
    let transport = MockTransport::new();
    transport.respond(CSRF_TOKEN_PATH, 200, CSRF_BODY).respond(
        OAuthValidateRequest::PATH,
        200,
        &login_body("TICKET_AGENT"),
    );
    let api = MetroApi::new(transport);
    let store = RefCell::new(Session::new());

    let request = OAuthValidateRequest {
        code: "abc".into(),
        state: Some("xyz".into()),
    };
    let landing = AuthFlow::new(&api, &store)
        .complete_oauth(&request)
        .await
        .unwrap();

    assert_eq!(landing, AppRoute::TicketAgentDashboard);
    let sent = api
        .transport()
        .last_request(OAuthValidateRequest::PATH)
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["code"], "abc");
    assert_eq!(body["state"], "xyz");
}

#[tokio::test]
async fn unavailable_oauth_validation_records_error_code() {
    let transport = MockTransport::new();
    transport
        .respond(CSRF_TOKEN_PATH, 200, CSRF_BODY)
        .respond(OAuthValidateRequest::PATH, 503, "Service Unavailable");
    let api = MetroApi::new(transport);
    let store = RefCell::new(Session::new());

    let request = OAuthValidateRequest {
        code: "abc".into(),
        state: None,
    };
    let err = AuthFlow::new(&api, &store)
        .complete_oauth(&request)
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::Api(ApiError::ServerFault { code: 503 }));
    assert_eq!(store.snapshot().last_error_code(), Some(503));
}

// =========================================================
// Logout / expiry
// =========================================================

async fn logged_in() -> (MetroApi<MockTransport>, RefCell<Session>) {
    let transport = MockTransport::new();
    transport.respond(CSRF_TOKEN_PATH, 200, CSRF_BODY);
    let (api, store) = with_login_response(transport, "OPERATOR");
    AuthFlow::new(&api, &store)
        .login(&credentials())
        .await
        .unwrap();
    (api, store)
}

#[tokio::test]
async fn logout_clears_user_and_keeps_token() {
    let (api, store) = logged_in().await;
    api.transport()
        .respond(LogoutRequest::PATH, 200, r#"{"meta":{"status":200}}"#);

    AuthFlow::new(&api, &store).logout().await;

    let session = store.snapshot();
    assert!(!session.is_authenticated());
    assert_eq!(session.role(), Role::Guest);
    assert_eq!(session.anti_forgery_token(), Some("csrf-123"));

    let sent = api.transport().last_request(LogoutRequest::PATH).unwrap();
    assert_eq!(sent.header(HEADER_CSRF_TOKEN), Some("csrf-123"));
}

#[tokio::test]
async fn logout_twice_is_harmless() {
    let (api, store) = logged_in().await;

    // 未预置注销响应：后端调用失败只记录日志
    let flow = AuthFlow::new(&api, &store);
    flow.logout().await;
    let after_first = store.snapshot();
    flow.logout().await;

    assert_eq!(store.snapshot(), after_first);
    assert!(!after_first.is_authenticated());
}

#[tokio::test]
async fn expire_resets_everything() {
    let (api, store) = logged_in().await;
    store.mutate(|s| s.set_error_code(Some(503)));
    api.transport()
        .respond(LogoutRequest::PATH, 500, r#"{"meta":{"status":500}}"#);

    AuthFlow::new(&api, &store).expire().await;

    assert_eq!(store.snapshot(), Session::new());
    // 注销使用重置前持有的令牌
    let sent = api.transport().last_request(LogoutRequest::PATH).unwrap();
    assert_eq!(sent.header(HEADER_CSRF_TOKEN), Some("csrf-123"));
}

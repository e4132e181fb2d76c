use super::*;
use metro_shared::{CreateLineRequest, DeleteLineRequest, DeleteTarget, ListLinesRequest, Role};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

// =========================================================
// Shared Mock Components
// =========================================================

/// 按路径返回预置响应，并记录收到的所有请求
#[derive(Default)]
pub struct MockTransport {
    responses: RefCell<HashMap<String, VecDeque<Result<HttpResponse, ApiError>>>>,
    pub requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, status: u16, body: &str) -> &Self {
        self.push(
            path,
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
        )
    }

    pub fn fail(&self, path: &str, err: ApiError) -> &Self {
        self.push(path, Err(err))
    }

    fn push(&self, path: &str, response: Result<HttpResponse, ApiError>) -> &Self {
        self.responses
            .borrow_mut()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.path.clone()).collect()
    }

    pub fn last_request(&self, path: &str) -> Option<HttpRequest> {
        self.requests
            .borrow()
            .iter()
            .rev()
            .find(|r| r.path == path)
            .cloned()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let path = request.path.clone();
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::Network(format!("no canned response for {path}"))))
    }
}

pub const CSRF_BODY: &str = r#"{"token":"csrf-123"}"#;

fn store() -> RefCell<Session> {
    RefCell::new(Session::new())
}

fn logged_in_store() -> RefCell<Session> {
    let store = store();
    let payload: ApiEnvelope<metro_shared::LoginData> = serde_json::from_str(
        r#"{"meta":{"status":200},"data":{"staff":{"id":"1","username":"op","role":"OPERATOR"}}}"#,
    )
    .unwrap();
    store.mutate(|s| {
        s.login(&payload).unwrap();
    });
    store
}

// =========================================================
// Envelope interpretation
// =========================================================

#[test]
fn check_envelope_maps_statuses() {
    let ok: ApiEnvelope<u32> = serde_json::from_str(r#"{"meta":{"status":201},"data":7}"#).unwrap();
    assert_eq!(check_envelope(ok), Ok(Some(7)));

    let rejected: ApiEnvelope<u32> =
        serde_json::from_str(r#"{"meta":{"status":409,"message":"编号已存在"}}"#).unwrap();
    assert_eq!(
        check_envelope(rejected),
        Err(ApiError::Rejected {
            status: 409,
            message: Some("编号已存在".into())
        })
    );

    let unauthorized: ApiEnvelope<u32> =
        serde_json::from_str(r#"{"meta":{"status":401}}"#).unwrap();
    assert_eq!(check_envelope(unauthorized), Err(ApiError::Unauthorized));
}

#[test]
fn apply_error_logs_out_on_unauthorized() {
    let store = logged_in_store();
    store.mutate(|s| s.set_anti_forgery_token("keep"));

    apply_error(&store, &ApiError::Unauthorized);

    let session = store.snapshot();
    assert!(!session.is_authenticated());
    assert_eq!(session.anti_forgery_token(), Some("keep"));
}

#[test]
fn apply_error_records_server_fault() {
    let store = logged_in_store();
    apply_error(&store, &ApiError::ServerFault { code: 503 });
    let session = store.snapshot();
    assert_eq!(session.last_error_code(), Some(503));
    assert!(session.is_authenticated());
}

#[test]
fn apply_error_ignores_field_level_failures() {
    let store = logged_in_store();
    let before = store.snapshot();
    apply_error(
        &store,
        &ApiError::Rejected {
            status: 422,
            message: None,
        },
    );
    apply_error(&store, &ApiError::Network("offline".into()));
    assert_eq!(store.snapshot(), before);
}

// =========================================================
// Transport-backed calls
// =========================================================

#[tokio::test]
async fn get_requests_carry_no_body_or_token() {
    let transport = MockTransport::new();
    transport.respond(
        ListLinesRequest::PATH,
        200,
        r##"{"meta":{"status":200},"data":[{"id":"l1","code":"L1","name":"1号线","color":"#C23A30"}]}"##,
    );
    let api = MetroApi::new(transport);
    let store = logged_in_store();

    let lines = api.fetch(&store, &ListLinesRequest).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name, "1号线");

    let sent = api.transport().last_request(ListLinesRequest::PATH).unwrap();
    assert_eq!(sent.method, HttpMethod::Get);
    assert!(sent.body.is_none());
    assert!(sent.header(HEADER_CSRF_TOKEN).is_none());
    assert_eq!(api.transport().paths(), vec![ListLinesRequest::PATH.to_string()]);
}

#[tokio::test]
async fn state_changing_request_fetches_token_once() {
    let transport = MockTransport::new();
    transport
        .respond(CSRF_TOKEN_PATH, 200, CSRF_BODY)
        .respond(
            CreateLineRequest::PATH,
            201,
            r##"{"meta":{"status":201},"data":{"id":"l9","code":"L9","name":"9号线","color":"#00A0E9"}}"##,
        )
        .respond(DeleteLineRequest::PATH, 200, r#"{"meta":{"status":200}}"#);
    let api = MetroApi::new(transport);
    let store = logged_in_store();

    let created = api
        .fetch(
            &store,
            &CreateLineRequest {
                code: "L9".into(),
                name: "9号线".into(),
                color: "#00A0E9".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, "l9");

    let deleted = api
        .call(&store, &DeleteLineRequest(DeleteTarget { id: "l9".into() }))
        .await
        .unwrap();
    assert!(deleted.is_none());

    let transport = api.transport();
    assert_eq!(
        transport.paths(),
        vec![
            CSRF_TOKEN_PATH.to_string(),
            CreateLineRequest::PATH.to_string(),
            DeleteLineRequest::PATH.to_string(),
        ]
    );
    // 新增与删除共用同一路径，按发送顺序检查
    let requests = transport.requests.borrow();
    let create = &requests[1];
    assert_eq!(create.method, HttpMethod::Post);
    assert_eq!(create.header(HEADER_CSRF_TOKEN), Some("csrf-123"));
    assert_eq!(create.header("content-type"), Some("application/json"));
    let body: serde_json::Value = serde_json::from_str(create.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["code"], "L9");

    let delete = &requests[2];
    assert_eq!(delete.method, HttpMethod::Delete);
    assert_eq!(delete.header(HEADER_CSRF_TOKEN), Some("csrf-123"));
    assert_eq!(delete.body.as_deref(), Some(r#"{"id":"l9"}"#));
    assert_eq!(store.snapshot().anti_forgery_token(), Some("csrf-123"));
}

#[tokio::test]
async fn token_fetch_failure_is_swallowed() {
    let transport = MockTransport::new();
    transport.fail(CSRF_TOKEN_PATH, ApiError::Network("offline".into()));
    let api = MetroApi::new(transport);
    let store = store();

    assert_eq!(api.ensure_anti_forgery_token(&store).await, None);
    // 失败后释放占用，下一次可以重新获取
    assert!(store.with_session(|s| s.clone().begin_token_fetch()));
}

#[tokio::test]
async fn token_fetch_in_flight_is_not_repeated() {
    let api = MetroApi::new(MockTransport::new());
    let store = store();
    store.mutate(|s| {
        s.begin_token_fetch();
    });

    assert_eq!(api.ensure_anti_forgery_token(&store).await, None);
    assert!(api.transport().paths().is_empty());
}

#[tokio::test]
async fn backend_unauthorized_ends_session() {
    let transport = MockTransport::new();
    transport.respond(
        ListLinesRequest::PATH,
        200,
        r#"{"meta":{"status":401,"message":"token expired"}}"#,
    );
    let api = MetroApi::new(transport);
    let store = logged_in_store();

    let err = api.call(&store, &ListLinesRequest).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
    assert!(!store.snapshot().is_authenticated());
}

#[tokio::test]
async fn unparseable_5xx_body_becomes_server_fault() {
    let transport = MockTransport::new();
    transport.respond(ListLinesRequest::PATH, 502, "<html>Bad Gateway</html>");
    let api = MetroApi::new(transport);
    let store = logged_in_store();

    let err = api.call(&store, &ListLinesRequest).await.unwrap_err();
    assert_eq!(err, ApiError::ServerFault { code: 502 });
    let session = store.snapshot();
    assert_eq!(session.last_error_code(), Some(502));
    assert_eq!(session.role(), Role::Operator);
}

#[tokio::test]
async fn unparseable_2xx_body_is_decode_error() {
    let transport = MockTransport::new();
    transport.respond(ListLinesRequest::PATH, 200, "not json");
    let api = MetroApi::new(transport);
    let store = logged_in_store();

    let err = api.call(&store, &ListLinesRequest).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert!(store.snapshot().is_authenticated());
}

#[tokio::test]
async fn fetch_without_data_is_decode_error() {
    let transport = MockTransport::new();
    transport.respond(ListLinesRequest::PATH, 200, r#"{"meta":{"status":200}}"#);
    let api = MetroApi::new(transport);

    let err = api.fetch(&store(), &ListLinesRequest).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

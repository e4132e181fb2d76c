//! 后端接口层
//!
//! `Transport` 抽象 HTTP 发送；`MetroApi` 负责序列化、统一响应包装的解释，
//! 以及把 401 / 5xx 反馈写回会话。浏览器实现见 `web::FetchTransport`。

use async_trait::async_trait;
use metro_shared::{
    ApiEnvelope, ApiRequest, CSRF_TOKEN_PATH, CsrfTokenResponse, HEADER_CSRF_TOKEN, HttpMethod,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::session::{Session, SessionStore};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP 发送抽象
///
/// 所有请求都携带凭据（cookie）发送。
#[async_trait(?Send)]
pub trait Transport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

// =========================================================
// API 客户端
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct MetroApi<T> {
    transport: T,
}

impl<T: Transport> MetroApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 获取防伪令牌（接口直接返回 `{ token }`）
    pub async fn fetch_anti_forgery_token(&self) -> Result<String, ApiError> {
        let response = self
            .transport
            .execute(HttpRequest::new(HttpMethod::Get, CSRF_TOKEN_PATH))
            .await?;
        if !(200..300).contains(&response.status) {
            return Err(ApiError::from_status(response.status, None));
        }
        let body: CsrfTokenResponse = decode_json(&response.body)?;
        Ok(body.token)
    }

    /// 发送请求并返回原始响应包装（不解释 `meta.status`）
    pub async fn send<R: ApiRequest>(
        &self,
        request: &R,
        anti_forgery_token: Option<&str>,
    ) -> Result<ApiEnvelope<R::Response>, ApiError> {
        let mut http = HttpRequest::new(R::METHOD, R::PATH);
        if R::METHOD.is_state_changing() {
            let body = serde_json::to_string(request).map_err(|e| ApiError::Decode(e.to_string()))?;
            http = http
                .with_header("Content-Type", "application/json")
                .with_body(body);
            if let Some(token) = anti_forgery_token {
                http = http.with_header(HEADER_CSRF_TOKEN, token);
            }
        }

        let response = self.transport.execute(http).await?;
        decode_envelope(&response)
    }

    /// 确保会话持有防伪令牌
    ///
    /// 同一时刻只允许一次获取；获取进行中时其它调用者直接返回 `None`，
    /// 不等待也不重复请求。获取失败仅记录日志。
    pub async fn ensure_anti_forgery_token(&self, store: &impl SessionStore) -> Option<String> {
        if let Some(token) = store.with_session(|s| s.anti_forgery_token().map(str::to_owned)) {
            return Some(token);
        }

        let mut claimed = false;
        store.mutate(|s| claimed = s.begin_token_fetch());
        if !claimed {
            log::debug!("[Api] anti-forgery token fetch already in flight");
            return None;
        }

        match self.fetch_anti_forgery_token().await {
            Ok(token) => {
                store.mutate(|s| s.finish_token_fetch(Some(token.clone())));
                Some(token)
            }
            Err(err) => {
                log::warn!("[Api] failed to fetch anti-forgery token: {err}");
                store.mutate(|s| s.finish_token_fetch(None));
                None
            }
        }
    }

    /// 业务请求的统一入口
    ///
    /// - 状态变更请求自动附带防伪令牌
    /// - 401 → 会话注销
    /// - 5xx → 记录错误码，交由故障页展示
    pub async fn call<R: ApiRequest>(
        &self,
        store: &impl SessionStore,
        request: &R,
    ) -> Result<Option<R::Response>, ApiError> {
        let token = if R::METHOD.is_state_changing() {
            self.ensure_anti_forgery_token(store).await
        } else {
            None
        };

        let result = self
            .send(request, token.as_deref())
            .await
            .and_then(check_envelope);
        if let Err(err) = &result {
            apply_error(store, err);
        }
        result
    }

    /// 同 `call`，但要求响应必须携带 `data`
    pub async fn fetch<R: ApiRequest>(
        &self,
        store: &impl SessionStore,
        request: &R,
    ) -> Result<R::Response, ApiError> {
        self.call(store, request)
            .await?
            .ok_or_else(|| ApiError::Decode(format!("{} returned no data", R::PATH)))
    }
}

/// 解释响应包装的 `meta.status`
pub fn check_envelope<T>(envelope: ApiEnvelope<T>) -> Result<Option<T>, ApiError> {
    if envelope.is_success() {
        Ok(envelope.data)
    } else {
        Err(ApiError::from_status(
            envelope.meta.status,
            envelope.meta.message,
        ))
    }
}

/// 把需要全局处理的错误写回会话
pub fn apply_error(store: &impl SessionStore, err: &ApiError) {
    match err {
        ApiError::Unauthorized => {
            log::info!("[Api] backend reported session invalid, logging out");
            store.mutate(Session::logout);
        }
        ApiError::ServerFault { code } => {
            log::error!("[Api] server fault {code}");
            let code = *code;
            store.mutate(|s| s.set_error_code(Some(code)));
        }
        _ => {}
    }
}

/// 浏览器环境下使用的客户端
pub type ConsoleApi = MetroApi<crate::web::FetchTransport>;

/// 从 Context 获取 API 客户端
pub fn use_api() -> ConsoleApi {
    leptos::prelude::use_context::<ConsoleApi>().expect("ConsoleApi should be provided")
}

fn decode_json<D: DeserializeOwned>(body: &str) -> Result<D, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// 解析响应体；无法解析时按 HTTP 状态码兜底归类
fn decode_envelope<D: DeserializeOwned>(
    response: &HttpResponse,
) -> Result<ApiEnvelope<D>, ApiError> {
    match serde_json::from_str::<ApiEnvelope<D>>(&response.body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !(200..300).contains(&response.status) => {
            Err(ApiError::from_status(response.status, None))
        }
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}

#[cfg(test)]
pub mod tests;

//! HTTP 发送实现
//!
//! 基于 `gloo-net` 实现 `Transport`，所有请求都携带 cookie 凭据。

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use metro_shared::HttpMethod;
use web_sys::RequestCredentials;

use crate::api::{HttpRequest, HttpResponse, Transport};
use crate::error::ApiError;

/// 浏览器 fetch 发送器
#[derive(Debug, Clone, Copy)]
pub struct FetchTransport {
    base_url: &'static str,
}

impl FetchTransport {
    pub fn new(base_url: &'static str) -> Self {
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn builder(&self, method: HttpMethod, path: &str) -> RequestBuilder {
        let url = self.url(path);
        match method {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
            HttpMethod::Delete => Request::delete(&url),
        }
    }
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self
            .builder(request.method, &request.path)
            .credentials(RequestCredentials::Include);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        let prepared = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        log::debug!("[Api] {} {}", request.method.as_str(), request.path);
        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

//! 前端错误类型
//!
//! 所有网络调用的失败都在调用处转换为界面状态，不会以 panic 形式传播。

use thiserror::Error;

use crate::session::SessionError;

pub const MSG_NETWORK: &str = "网络连接失败，请稍后重试";
pub const MSG_LOGIN_FALLBACK: &str = "登录失败，请检查邮箱和密码";
pub const MSG_REQUEST_FALLBACK: &str = "请求失败，请稍后重试";
pub const MSG_SESSION_EXPIRED: &str = "登录已失效，请重新登录";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 传输层失败（fetch 抛出异常）
    #[error("network error: {0}")]
    Network(String),
    /// 响应无法解析
    #[error("malformed response: {0}")]
    Decode(String),
    /// 后端业务拒绝（`meta.status` 非 2xx，且不属于 401 / 5xx）
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// 后端报告会话无效
    #[error("session is no longer valid")]
    Unauthorized,
    /// 服务端故障
    #[error("server fault {code}")]
    ServerFault { code: u16 },
}

impl ApiError {
    /// 按状态码归类
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            500.. => ApiError::ServerFault { code: status },
            _ => ApiError::Rejected { status, message },
        }
    }

    /// 面向用户的提示文案
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => MSG_NETWORK.to_string(),
            ApiError::Decode(_) => MSG_REQUEST_FALLBACK.to_string(),
            ApiError::Rejected { message, .. } => non_empty(message.as_deref())
                .unwrap_or(MSG_REQUEST_FALLBACK)
                .to_string(),
            ApiError::Unauthorized => MSG_SESSION_EXPIRED.to_string(),
            ApiError::ServerFault { code } => format!("服务暂时不可用（{code}）"),
        }
    }
}

/// 认证流程错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    /// 登录表单下方展示的文案：优先使用后端消息，否则使用默认文案
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(ApiError::Network(_)) => MSG_NETWORK.to_string(),
            AuthError::Api(ApiError::ServerFault { code }) => {
                ApiError::ServerFault { code: *code }.user_message()
            }
            AuthError::Api(ApiError::Rejected { message, .. })
            | AuthError::Session(SessionError::Rejected { message, .. }) => {
                non_empty(message.as_deref())
                    .unwrap_or(MSG_LOGIN_FALLBACK)
                    .to_string()
            }
            AuthError::Api(_) | AuthError::Session(SessionError::MissingUser) => {
                MSG_LOGIN_FALLBACK.to_string()
            }
        }
    }
}

fn non_empty(message: Option<&str>) -> Option<&str> {
    message.map(str::trim).filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(ApiError::from_status(401, None), ApiError::Unauthorized);
        assert_eq!(
            ApiError::from_status(503, None),
            ApiError::ServerFault { code: 503 }
        );
        assert_eq!(
            ApiError::from_status(422, Some("bad".into())),
            ApiError::Rejected {
                status: 422,
                message: Some("bad".into())
            }
        );
    }

    #[test]
    fn login_message_prefers_backend_text() {
        let err = AuthError::Session(SessionError::Rejected {
            status: 401,
            message: Some("账号已停用".into()),
        });
        assert_eq!(err.user_message(), "账号已停用");
    }

    #[test]
    fn login_message_falls_back_on_blank_or_missing_text() {
        for message in [None, Some("   ".to_string())] {
            let err = AuthError::Session(SessionError::Rejected {
                status: 401,
                message,
            });
            assert_eq!(err.user_message(), MSG_LOGIN_FALLBACK);
        }
        assert_eq!(
            AuthError::Session(SessionError::MissingUser).user_message(),
            MSG_LOGIN_FALLBACK
        );
    }

    #[test]
    fn transport_failure_asks_to_retry() {
        let err = AuthError::from(ApiError::Network("offline".into()));
        assert_eq!(err.user_message(), MSG_NETWORK);
    }
}

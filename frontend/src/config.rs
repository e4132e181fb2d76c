//! 编译期配置
//!
//! 构建时通过环境变量注入：
//! - `METRO_API_BASE`: 后端地址，默认与页面同源
//! - `METRO_OAUTH_URL`: OAuth 授权入口

const DEFAULT_API_BASE: &str = "/";
const DEFAULT_OAUTH_URL: &str = "/v1/auth/oauth2/authorize";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: &'static str,
    pub oauth_authorize_url: &'static str,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: or_default(option_env!("METRO_API_BASE"), DEFAULT_API_BASE),
            oauth_authorize_url: or_default(option_env!("METRO_OAUTH_URL"), DEFAULT_OAUTH_URL),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE,
            oauth_authorize_url: DEFAULT_OAUTH_URL,
        }
    }
}

/// 空白值视为未设置
fn or_default(value: Option<&'static str>, default: &'static str) -> &'static str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

/// 从 Context 获取配置
pub fn use_config() -> AppConfig {
    leptos::prelude::use_context::<AppConfig>().unwrap_or_default()
}

//! LocalStorage 封装模块
//!
//! 只保存上次登录使用的邮箱，用于表单自动填充。密码永不落盘。

use gloo_storage::{LocalStorage, Storage};

const EMAIL_KEY: &str = "metro_console_email";

/// 记住的登录邮箱
pub struct RememberedLogin;

impl RememberedLogin {
    /// 读取上次登录的邮箱；不存在或读取失败时返回 `None`
    pub fn email() -> Option<String> {
        LocalStorage::get::<String>(EMAIL_KEY)
            .ok()
            .filter(|email| !email.trim().is_empty())
    }

    pub fn remember(email: &str) {
        if let Err(err) = LocalStorage::set(EMAIL_KEY, email.trim()) {
            log::warn!("[Auth] failed to remember login email: {err}");
        }
    }

    pub fn forget() {
        LocalStorage::delete(EMAIL_KEY);
    }
}

//! 会话状态模块
//!
//! `Session` 是“谁在登录、以什么角色登录”的唯一事实来源。
//! 纯逻辑层，不依赖 DOM 或信号系统；所有修改都必须通过这里定义的操作完成。
//!
//! 已认证 ⇔ 存在用户：两者由同一个 `Option<StaffUser>` 表达，无法出现不一致。

use metro_shared::{ApiEnvelope, LoginData, Role, StaffUser};
use std::cell::RefCell;
use thiserror::Error;

/// 会话生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Authenticated(Role),
}

/// 登录响应无法建立会话的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 后端拒绝（`meta.status` 非 2xx）
    #[error("login rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    /// 成功响应中缺少 `staff` 字段
    #[error("login response carries no staff record")]
    MissingUser,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<StaffUser>,
    anti_forgery_token: Option<String>,
    last_error_code: Option<u16>,
    token_fetch_in_flight: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // --- 读取 ---

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&StaffUser> {
        self.user.as_ref()
    }

    /// 当前角色；未登录时为 `Guest`
    pub fn role(&self) -> Role {
        self.user.as_ref().map(|u| u.role).unwrap_or_default()
    }

    pub fn phase(&self) -> SessionPhase {
        match &self.user {
            Some(user) => SessionPhase::Authenticated(user.role),
            None => SessionPhase::Anonymous,
        }
    }

    pub fn anti_forgery_token(&self) -> Option<&str> {
        self.anti_forgery_token.as_deref()
    }

    pub fn last_error_code(&self) -> Option<u16> {
        self.last_error_code
    }

    // --- 修改 ---

    /// 从登录（或 OAuth 校验）响应建立会话
    ///
    /// 失败时状态保持不变。重复登录会以新用户替换旧会话。
    pub fn login(&mut self, payload: &ApiEnvelope<LoginData>) -> Result<&StaffUser, SessionError> {
        if !payload.is_success() {
            return Err(SessionError::Rejected {
                status: payload.meta.status,
                message: payload.meta.message.clone(),
            });
        }
        let staff = payload
            .data
            .as_ref()
            .and_then(|d| d.staff.as_ref())
            .ok_or(SessionError::MissingUser)?;
        let user: &StaffUser = self.user.insert(staff.clone());
        Ok(user)
    }

    /// 注销：清除用户，保留防伪令牌
    pub fn logout(&mut self) {
        self.user = None;
    }

    /// 完全重置（包括防伪令牌与错误码）
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_anti_forgery_token(&mut self, token: impl Into<String>) {
        self.anti_forgery_token = Some(token.into());
    }

    pub fn set_error_code(&mut self, code: Option<u16>) {
        self.last_error_code = code;
    }

    /// 尝试占用防伪令牌获取权
    ///
    /// 已有令牌或已有获取在进行中时返回 `false`。
    pub fn begin_token_fetch(&mut self) -> bool {
        if self.anti_forgery_token.is_some() || self.token_fetch_in_flight {
            return false;
        }
        self.token_fetch_in_flight = true;
        true
    }

    pub fn finish_token_fetch(&mut self, token: Option<String>) {
        self.token_fetch_in_flight = false;
        if let Some(token) = token {
            self.anti_forgery_token = Some(token);
        }
    }
}

// =========================================================
// 状态容器抽象
// =========================================================

/// 会话容器
///
/// 浏览器中由信号实现（见 `auth::SessionContext`），测试中使用 `RefCell<Session>`。
/// 每次 `mutate` 都是一次原子替换，不会被观察到半完成的状态。
pub trait SessionStore {
    fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R;
    fn mutate(&self, f: impl FnOnce(&mut Session));

    fn snapshot(&self) -> Session {
        self.with_session(Session::clone)
    }
}

impl SessionStore for RefCell<Session> {
    fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&*self.borrow())
    }

    fn mutate(&self, f: impl FnOnce(&mut Session)) {
        f(&mut *self.borrow_mut());
    }
}

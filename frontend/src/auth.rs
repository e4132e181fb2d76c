//! 认证模块
//!
//! 管理会话上下文与认证流程，与路由系统解耦。
//! 路由服务通过注入的会话信号检查认证状态，通过注入的回调触发过期处理。

use leptos::prelude::*;
use leptos::task::spawn_local;
use metro_shared::{
    ApiEnvelope, ApiRequest, LoginData, LoginRequest, LogoutRequest, OAuthValidateRequest, Role,
    StaffUser,
};

use crate::api::{ConsoleApi, MetroApi, Transport, apply_error, check_envelope};
use crate::error::{ApiError, AuthError};
use crate::session::{Session, SessionError, SessionStore};
use crate::web::route::{AppRoute, landing_route};

// =========================================================
// 会话上下文
// =========================================================

/// 会话上下文
///
/// 包装 `RwSignal<Session>`，通过 Context 在组件间共享。
/// 组件通过带追踪的读取方法订阅变化，修改只能走 `SessionStore::mutate`。
#[derive(Clone, Copy)]
pub struct SessionContext {
    state: RwSignal<Session>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            state: RwSignal::new(Session::new()),
        }
    }

    /// 只读会话信号（用于路由服务注入）
    pub fn state(&self) -> Signal<Session> {
        self.state.read_only().into()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(Session::is_authenticated)
    }

    pub fn role(&self) -> Role {
        self.state.with(Session::role)
    }

    pub fn user(&self) -> Option<StaffUser> {
        self.state.with(|s| s.user().cloned())
    }

    pub fn last_error_code(&self) -> Option<u16> {
        self.state.with(Session::last_error_code)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for SessionContext {
    fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        self.state.with_untracked(f)
    }

    fn mutate(&self, f: impl FnOnce(&mut Session)) {
        self.state.update(f);
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

// =========================================================
// 认证流程
// =========================================================

/// 认证流程控制器
///
/// 不依赖信号系统，可注入任意 `Transport` 与 `SessionStore` 进行测试。
pub struct AuthFlow<'a, T, S> {
    api: &'a MetroApi<T>,
    store: &'a S,
}

impl<'a, T: Transport, S: SessionStore> AuthFlow<'a, T, S> {
    pub fn new(api: &'a MetroApi<T>, store: &'a S) -> Self {
        Self { api, store }
    }

    /// 邮箱密码登录，成功后返回按角色决定的落地路由
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AppRoute, AuthError> {
        self.authenticate(credentials).await
    }

    /// OAuth 回调：把授权码交给后端校验，响应结构与登录一致
    pub async fn complete_oauth(
        &self,
        request: &OAuthValidateRequest,
    ) -> Result<AppRoute, AuthError> {
        self.authenticate(request).await
    }

    /// 用户主动注销：清除用户（保留防伪令牌），并通知后端
    pub async fn logout(&self) {
        let token = self.current_token();
        self.store.mutate(Session::logout);
        log::info!("[Auth] signed out");
        self.notify_backend(token).await;
    }

    /// 守卫检测到未认证访问：完全重置会话，并尽力通知后端
    pub async fn expire(&self) {
        let token = self.current_token();
        self.store.mutate(Session::reset);
        log::info!("[Auth] unauthenticated access detected, session reset");
        self.notify_backend(token).await;
    }

    /// 发送认证请求；传输层失败（如网关返回的非 JSON 5xx 页面）同样写入会话
    async fn authenticate<R>(&self, request: &R) -> Result<AppRoute, AuthError>
    where
        R: ApiRequest<Response = LoginData>,
    {
        let token = self.api.ensure_anti_forgery_token(self.store).await;
        let envelope = self
            .api
            .send(request, token.as_deref())
            .await
            .inspect_err(|err| apply_error(self.store, err))?;
        self.establish(envelope)
    }

    fn establish(&self, envelope: ApiEnvelope<LoginData>) -> Result<AppRoute, AuthError> {
        if envelope.meta.status >= 500 {
            let err = ApiError::ServerFault {
                code: envelope.meta.status,
            };
            apply_error(self.store, &err);
            return Err(err.into());
        }

        let mut outcome = Err(SessionError::MissingUser);
        self.store
            .mutate(|s| outcome = s.login(&envelope).map(|user| user.role));
        let role = outcome.inspect_err(|err| log::info!("[Auth] sign-in refused: {err}"))?;

        let landing = landing_route(role);
        log::info!("[Auth] signed in as {role:?}, landing at {landing}");
        Ok(landing)
    }

    fn current_token(&self) -> Option<String> {
        self.store
            .with_session(|s| s.anti_forgery_token().map(str::to_owned))
    }

    /// 尽力而为的后端注销；失败只记录日志，不影响本地状态
    async fn notify_backend(&self, token: Option<String>) {
        let result = self
            .api
            .send(&LogoutRequest, token.as_deref())
            .await
            .and_then(check_envelope);
        if let Err(err) = result {
            log::warn!("[Auth] best-effort logout failed: {err}");
        }
    }
}

/// 在后台执行会话过期处理（供路由守卫回调使用）
pub fn spawn_expire(api: ConsoleApi, session: SessionContext) {
    spawn_local(async move {
        AuthFlow::new(&api, &session).expire().await;
    });
}

/// 在后台执行用户注销
pub fn spawn_logout(api: ConsoleApi, session: SessionContext) {
    spawn_local(async move {
        AuthFlow::new(&api, &session).logout().await;
    });
}

#[cfg(test)]
mod tests;

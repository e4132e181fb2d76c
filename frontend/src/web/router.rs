//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, Navigation, resolve};
use crate::session::Session;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 读取当前 URL 查询串中的参数
pub fn query_param(key: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    web_sys::UrlSearchParams::new_with_str(&search)
        .ok()?
        .get(key)
        .filter(|v| !v.is_empty())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话信号与未认证处理回调均由外部注入，路由本身不修改会话。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（注入的信号，实现解耦）
    session: Signal<Session>,
    /// 守卫发现未认证访问时触发
    on_unauthenticated: Callback<()>,
}

impl RouterService {
    fn new(session: Signal<Session>, on_unauthenticated: Callback<()>) -> Self {
        // 先以 URL 解析结果占位，守卫检查在 provide_router 中执行
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            session,
            on_unauthenticated,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate_to(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState；重定向总是 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let (is_auth, role) = self
            .session
            .with_untracked(|s| (s.is_authenticated(), s.role()));

        let navigation = resolve(target_route, is_auth, role);
        if let Navigation::Redirect { to, reason } = navigation {
            log::info!("[Router] {target_route} -> {to} ({reason:?})");
        }
        // 被拦下的地址不留在历史记录中，后退不会再次触发守卫
        self.commit(
            navigation.destination(),
            use_push && navigation.pushes_history(),
        );
        if navigation.should_expire() {
            self.on_unauthenticated.run(());
        }
    }

    /// 写入 History 并更新当前路由
    ///
    /// 地址栏已指向同一路由时不改写，保留查询串（OAuth 回调依赖它）。
    fn commit(&self, route: AppRoute, use_push: bool) {
        if AppRoute::from_path(&current_path()) != route {
            if use_push {
                push_history_state(route.to_path());
            } else {
                replace_history_state(route.to_path());
            }
        }
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        // popstate 时同样执行守卫逻辑
        let closure = Closure::<dyn Fn()>::new(move || {
            router.navigate_to_route(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时的自动重定向
    ///
    /// - 记录了服务端错误码 → 故障页
    /// - 登录 / 注销 / 401 导致当前页面不再可访问 → 按守卫结果重定向
    fn setup_session_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let (is_auth, role, error_code) = router
                .session
                .with(|s| (s.is_authenticated(), s.role(), s.last_error_code()));
            let route = router.current_route.get_untracked();

            if let Some(code) = error_code {
                if route != AppRoute::ServerError {
                    log::error!("[Router] server fault {code}, showing error page");
                    router.commit(AppRoute::ServerError, true);
                }
                return;
            }

            // 会话已经是最新状态，这里只跟随跳转，不再触发未认证处理
            if let Navigation::Redirect { to, reason } = resolve(route, is_auth, role) {
                log::info!("[Router] session changed: {route} -> {to} ({reason:?})");
                router.commit(to, false);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Session>, on_unauthenticated: Callback<()>) -> RouterService {
    let router = RouterService::new(session, on_unauthenticated);
    provide_context(router);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_session_redirect();

    // 对首次加载的地址执行守卫
    router.navigate_to_route(router.current_route.get_untracked(), false);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    /// 未认证访问的处理回调
    on_unauthenticated: Callback<()>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session, on_unauthenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击，走路由守卫而不是整页刷新
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional)] class: &'static str,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}

//! 地铁运营控制台前端
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `session`: 会话状态（纯逻辑，唯一事实来源）
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `api`: 后端接口层
//! - `auth`: 会话上下文与认证流程
//! - `components`: UI 组件层

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod session;

mod components {
    pub mod common;
    pub mod dashboard;
    pub mod layout;
    pub mod lines;
    pub mod login;
    pub mod oauth_callback;
    pub mod passengers;
    pub mod staff;
    pub mod stations;
    pub mod statistics;
    pub mod status_pages;
    pub mod tickets;
}

use crate::api::{ConsoleApi, MetroApi};
use crate::auth::{SessionContext, spawn_expire};
use crate::components::dashboard::{
    AdminDashboardPage, OperatorDashboardPage, ProfilePage, TicketAgentDashboardPage,
};
use crate::components::lines::LinesPage;
use crate::components::login::LoginPage;
use crate::components::oauth_callback::OAuthCallbackPage;
use crate::components::passengers::PassengersPage;
use crate::components::staff::StaffPage;
use crate::components::stations::StationsPage;
use crate::components::statistics::StatisticsPage;
use crate::components::status_pages::{HomePage, NotFoundPage, ServerErrorPage};
use crate::components::tickets::TicketsPage;
use crate::config::AppConfig;

use leptos::prelude::*;
use leptos::task::spawn_local;

// 浏览器 API 封装：History 路由、fetch 发送、LocalStorage
pub mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::FetchTransport;
    pub use storage::RememberedLogin;
}

use web::FetchTransport;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::OAuthCallback => view! { <OAuthCallbackPage /> }.into_any(),
        AppRoute::ServerError => view! { <ServerErrorPage /> }.into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::Staff => view! { <StaffPage /> }.into_any(),
        AppRoute::Statistics => view! { <StatisticsPage /> }.into_any(),
        AppRoute::Lines => view! { <LinesPage /> }.into_any(),
        AppRoute::Stations => view! { <StationsPage /> }.into_any(),
        AppRoute::OperatorDashboard => view! { <OperatorDashboardPage /> }.into_any(),
        AppRoute::TicketAgentDashboard => view! { <TicketAgentDashboardPage /> }.into_any(),
        AppRoute::Tickets => view! { <TicketsPage /> }.into_any(),
        AppRoute::Passengers => view! { <PassengersPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 编译期配置
    let config = AppConfig::from_env();
    provide_context(config);
    log::info!("[App] api base: {}", config.api_base_url);

    // 2. 会话上下文与 API 客户端
    let session = SessionContext::new();
    provide_context(session);
    let api: ConsoleApi = MetroApi::new(FetchTransport::new(config.api_base_url));
    provide_context(api);

    // 3. 预取防伪令牌；失败时由首个状态变更请求重试
    spawn_local(async move {
        api.ensure_anti_forgery_token(&session).await;
    });

    // 4. 守卫发现未认证访问时：本地重置会话并尽力通知后端
    let on_unauthenticated = Callback::new(move |_| spawn_expire(api, session));

    view! {
        // 5. 路由器组件：注入会话信号与未认证处理实现守卫
        <Router session=session.state() on_unauthenticated=on_unauthenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}

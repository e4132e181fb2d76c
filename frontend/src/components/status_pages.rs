//! 公开页面：首页、服务故障页、404

use leptos::prelude::*;

use crate::auth::use_session;
use crate::session::{Session, SessionStore};
use crate::web::route::{AppRoute, landing_route};
use crate::web::router::{Link, use_router};

#[component]
pub fn HomePage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let enter = move |_| router.navigate_to(landing_route(session.role()));

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <div class="max-w-md space-y-4">
                    <h1 class="text-5xl font-bold">"地铁运营控制台"</h1>
                    <p class="text-base-content/70">"线路、站点、票务与客流的统一管理入口。"</p>
                    <button class="btn btn-primary" on:click=enter>
                        {move || if session.is_authenticated() { "进入控制台" } else { "员工登录" }}
                    </button>
                </div>
            </div>
        </div>
    }
}

/// 服务故障页
///
/// 离开时清除记录的错误码。
#[component]
pub fn ServerErrorPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    on_cleanup(move || session.mutate(|s| s.set_error_code(None)));

    let code = move || {
        session
            .last_error_code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "500".to_string())
    };

    let go_home = move |_| {
        let role = session.with_session(Session::role);
        session.mutate(|s| s.set_error_code(None));
        router.navigate_to(landing_route(role));
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">{code}</h1>
                <p class="text-xl">"服务暂时不可用，请稍后再试"</p>
                <button class="btn btn-primary" on:click=go_home>"返回首页"</button>
            </div>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"页面未找到"</p>
                <Link to=AppRoute::Home class="btn btn-ghost">"返回首页"</Link>
            </div>
        </div>
    }
}

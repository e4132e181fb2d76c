//! 控制台外壳：导航栏与页面容器

use leptos::prelude::*;

use crate::api::use_api;
use crate::auth::{spawn_logout, use_session};
use crate::web::route::AppRoute;
use crate::web::router::use_router;

#[component]
pub fn ConsoleShell(
    /// 页面标题
    title: &'static str,
    children: Children,
) -> impl IntoView {
    let session = use_session();
    let api = use_api();
    let router = use_router();
    let current = router.current_route();

    // 导航项随角色变化
    let nav = move || {
        AppRoute::nav_items(session.role())
            .into_iter()
            .map(|route| {
                let class = move || {
                    if current.get() == route {
                        "btn btn-ghost btn-sm btn-active"
                    } else {
                        "btn btn-ghost btn-sm"
                    }
                };
                let on_click = move |ev: leptos::ev::MouseEvent| {
                    ev.prevent_default();
                    router.navigate_to(route);
                };
                view! {
                    <li>
                        <a href=route.to_path() class=class on:click=on_click>
                            {route.title()}
                        </a>
                    </li>
                }
            })
            .collect_view()
    };

    let username = move || session.user().map(|u| u.username).unwrap_or_default();

    // 注销后由路由服务监听会话变化并跳转登录页
    let on_logout = move |_| spawn_logout(api, session);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <span class="btn btn-ghost text-xl">"地铁运营控制台"</span>
                        <ul class="menu menu-horizontal px-1 hidden lg:flex">{nav}</ul>
                    </div>
                    <div class="flex-none gap-2">
                        <span class="font-mono text-sm">{username}</span>
                        <span class="badge badge-neutral">{move || session.role().label()}</span>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                            "退出登录"
                        </button>
                    </div>
                </div>

                <h2 class="text-2xl font-bold">{title}</h2>

                {children()}
            </div>
        </div>
    }
}

//! 第三方登录回调页
//!
//! 从地址栏读取 `code` / `state`，交由后端校验后按角色跳转。

use leptos::prelude::*;
use leptos::task::spawn_local;
use metro_shared::OAuthValidateRequest;

use crate::api::use_api;
use crate::auth::{AuthFlow, use_session};
use crate::error::MSG_LOGIN_FALLBACK;
use crate::web::route::AppRoute;
use crate::web::router::{Link, query_param, use_router};

#[component]
pub fn OAuthCallbackPage() -> impl IntoView {
    let session = use_session();
    let api = use_api();
    let router = use_router();

    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    match query_param("code") {
        Some(code) => {
            let request = OAuthValidateRequest {
                code,
                state: query_param("state"),
            };
            spawn_local(async move {
                match AuthFlow::new(&api, &session).complete_oauth(&request).await {
                    Ok(AppRoute::Login) => {
                        set_error_msg.set(Some("该账号没有控制台访问权限".to_string()));
                    }
                    Ok(landing) => router.navigate_to(landing),
                    Err(err) => set_error_msg.set(Some(err.user_message())),
                }
            });
        }
        None => {
            log::warn!("[Auth] OAuth callback without authorization code");
            set_error_msg.set(Some(MSG_LOGIN_FALLBACK.to_string()));
        }
    }

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content text-center">
                <Show
                    when=move || error_msg.get().is_some()
                    fallback=|| view! {
                        <div class="flex flex-col items-center gap-4">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                            <p>"正在验证登录信息..."</p>
                        </div>
                    }
                >
                    <div class="flex flex-col items-center gap-4">
                        <div role="alert" class="alert alert-error">
                            <span>{move || error_msg.get().unwrap_or_default()}</span>
                        </div>
                        <Link to=AppRoute::Login class="btn btn-primary">"返回登录"</Link>
                    </div>
                </Show>
            </div>
        </div>
    }
}

use crate::api::use_api;
use crate::auth::{AuthFlow, use_session};
use crate::config::use_config;
use crate::web::RememberedLogin;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use leptos::task::spawn_local;
use metro_shared::LoginRequest;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let api = use_api();
    let router = use_router();
    let config = use_config();

    // 只回填邮箱，密码永不保存
    let (email, set_email) = signal(RememberedLogin::email().unwrap_or_default());
    let (password, set_password) = signal(String::new());
    let (remember, set_remember) = signal(RememberedLogin::email().is_some());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let credentials = LoginRequest {
            email: email.get().trim().to_string(),
            password: password.get(),
        };
        if credentials.email.is_empty() || credentials.password.is_empty() {
            set_error_msg.set(Some("请填写邮箱和密码".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let remember = remember.get();
        spawn_local(async move {
            match AuthFlow::new(&api, &session).login(&credentials).await {
                Ok(landing) => {
                    if remember {
                        RememberedLogin::remember(&credentials.email);
                    } else {
                        RememberedLogin::forget();
                    }
                    set_password.set(String::new());
                    if landing == AppRoute::Login {
                        set_error_msg.set(Some("该账号没有控制台访问权限".to_string()));
                    } else {
                        router.navigate_to(landing);
                    }
                }
                Err(err) => set_error_msg.set(Some(err.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <h1 class="text-3xl font-bold">"地铁运营控制台"</h1>
                        <p class="text-base-content/70">"使用员工账号登录"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"邮箱"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="username"
                                placeholder="name@metro.example"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <label class="label cursor-pointer justify-start gap-2">
                            <input
                                type="checkbox"
                                class="checkbox checkbox-sm"
                                prop:checked=remember
                                on:change=move |ev| set_remember.set(event_target_checked(&ev))
                            />
                            <span class="label-text">"记住邮箱"</span>
                        </label>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "登录中..." }.into_any()
                                } else {
                                    "登录".into_any()
                                }}
                            </button>
                        </div>
                        <div class="divider text-sm">"或"</div>
                        <a class="btn btn-outline" href=config.oauth_authorize_url>
                            "使用统一身份认证登录"
                        </a>
                    </form>
                </div>
            </div>
        </div>
    }
}

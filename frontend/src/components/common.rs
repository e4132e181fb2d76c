//! 页面共用的小部件与请求辅助

use leptos::prelude::*;
use leptos::task::spawn_local;
use metro_shared::ApiRequest;

use crate::api::{ConsoleApi, use_api};
use crate::auth::{SessionContext, use_session};
use crate::error::ApiError;

// =========================================================
// 通知
// =========================================================

/// 页面右上角的通知：消息内容, 是否出错
#[derive(Clone, Copy)]
pub struct Notifier(RwSignal<Option<(String, bool)>>);

impl Notifier {
    pub fn new() -> Self {
        Self(RwSignal::new(None))
    }

    pub fn success(&self, message: impl Into<String>) {
        self.0.set(Some((message.into(), false)));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.0.set(Some((message.into(), true)));
    }

    /// 会话失效和服务端故障由路由统一处理，这里不再重复提示
    pub fn report(&self, context: &str, err: &ApiError) {
        match err {
            ApiError::Unauthorized | ApiError::ServerFault { .. } => {
                log::debug!("[Api] {context}: {err}");
            }
            _ => {
                log::warn!("[Api] {context}: {err}");
                self.error(format!("{context}: {}", err.user_message()));
            }
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// 通知提示框，3 秒后自动消失
#[component]
pub fn Toast(notifier: Notifier) -> impl IntoView {
    let notification = notifier.0;

    Effect::new(move |_| {
        if notification.get().is_some() {
            set_timeout(
                move || notification.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <Show when=move || notification.get().is_some()>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let is_err = notification.with(|n| n.as_ref().is_some_and(|(_, e)| *e));
                    if is_err { "alert alert-error shadow-lg" } else { "alert alert-success shadow-lg" }
                }>
                    <span>{move || notification.get().map(|(msg, _)| msg).unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}

// =========================================================
// 请求辅助
// =========================================================

/// 页面持有的后端访问句柄
///
/// 在组件创建时从 Context 取出，事件回调中直接使用。
#[derive(Clone, Copy)]
pub struct Backend {
    pub api: ConsoleApi,
    pub session: SessionContext,
}

pub fn use_backend() -> Backend {
    Backend {
        api: use_api(),
        session: use_session(),
    }
}

impl Backend {
    /// 拉取数据写入信号，期间维护加载状态
    pub fn load<R>(
        self,
        request: R,
        target: RwSignal<R::Response>,
        loading: RwSignal<bool>,
        notifier: Notifier,
    ) where
        R: ApiRequest + 'static,
        R::Response: Send + Sync + 'static,
    {
        loading.set(true);
        spawn_local(async move {
            match self.api.fetch(&self.session, &request).await {
                Ok(data) => target.set(data),
                Err(err) => notifier.report("加载失败", &err),
            }
            loading.set(false);
        });
    }

    /// 提交状态变更请求，成功后执行回调
    pub fn submit<R, F>(self, request: R, context: &'static str, notifier: Notifier, on_success: F)
    where
        R: ApiRequest + 'static,
        F: FnOnce(Option<R::Response>) + 'static,
    {
        spawn_local(async move {
            match self.api.call(&self.session, &request).await {
                Ok(data) => on_success(data),
                Err(err) => notifier.report(context, &err),
            }
        });
    }
}

// =========================================================
// 对话框
// =========================================================

/// 带触发按钮的模态表单框
///
/// `open` 由调用方持有，提交成功后置为 `false` 即可关闭。
#[component]
pub fn FormDialog(
    button_label: &'static str,
    title: &'static str,
    open: RwSignal<bool>,
    children: Children,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    view! {
        <button class="btn btn-primary gap-2" on:click=move |_| open.set(true)>
            {button_label}
        </button>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">{title}</h3>
                {children()}
            </div>
        </dialog>
    }
}

/// 表单校验错误提示
#[component]
pub fn FormError(error: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div role="alert" class="alert alert-error text-sm py-2">
                <span>{move || error.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

/// 表格中的空状态 / 加载状态行
#[component]
pub fn TablePlaceholder(
    colspan: u8,
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] empty: Signal<bool>,
    empty_text: &'static str,
) -> impl IntoView {
    view! {
        <Show when=move || loading.get() && empty.get()>
            <tr>
                <td colspan=colspan.to_string() class="text-center py-8 text-base-content/50">
                    <span class="loading loading-spinner loading-md"></span> " 加载中..."
                </td>
            </tr>
        </Show>
        <Show when=move || !loading.get() && empty.get()>
            <tr>
                <td colspan=colspan.to_string() class="text-center py-8 text-base-content/50">
                    {empty_text}
                </td>
            </tr>
        </Show>
    }
}

//! 线路管理页

use leptos::prelude::*;
use metro_shared::{CreateLineRequest, DeleteLineRequest, DeleteTarget, Line, ListLinesRequest};

use crate::components::common::{
    FormDialog, FormError, Notifier, TablePlaceholder, Toast, use_backend,
};
use crate::components::layout::ConsoleShell;

const DEFAULT_COLOR: &str = "#C23A30";

/// 新增线路表单状态
#[derive(Clone, Copy)]
struct LineForm {
    code: RwSignal<String>,
    name: RwSignal<String>,
    color: RwSignal<String>,
}

impl LineForm {
    fn new() -> Self {
        Self {
            code: RwSignal::new(String::new()),
            name: RwSignal::new(String::new()),
            color: RwSignal::new(DEFAULT_COLOR.to_string()),
        }
    }

    fn reset(&self) {
        self.code.set(String::new());
        self.name.set(String::new());
        self.color.set(DEFAULT_COLOR.to_string());
    }

    fn to_request(&self) -> CreateLineRequest {
        CreateLineRequest {
            code: self.code.get().trim().to_string(),
            name: self.name.get().trim().to_string(),
            color: self.color.get().trim().to_uppercase(),
        }
    }
}

#[component]
fn AddLineDialog(#[prop(into)] on_add: Callback<CreateLineRequest>) -> impl IntoView {
    let open = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let form = LineForm::new();

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = form.to_request();
        if let Err(msg) = req.validate() {
            error.set(Some(msg));
            return;
        }
        error.set(None);
        on_add.run(req);
        open.set(false);
        form.reset();
    };

    view! {
        <FormDialog button_label="新增线路" title="新增线路" open=open>
            <form on:submit=on_submit class="space-y-4 pt-4">
                <FormError error=error />
                <div class="grid grid-cols-2 gap-4">
                    <div class="form-control">
                        <label for="line_code" class="label">
                            <span class="label-text">"线路编号"</span>
                        </label>
                        <input id="line_code" required
                            type="text"
                            placeholder="L1"
                            on:input=move |ev| form.code.set(event_target_value(&ev))
                            prop:value=move || form.code.get()
                            class="input input-bordered w-full"
                        />
                    </div>
                    <div class="form-control">
                        <label for="line_name" class="label">
                            <span class="label-text">"线路名称"</span>
                        </label>
                        <input id="line_name" required
                            type="text"
                            placeholder="1号线"
                            on:input=move |ev| form.name.set(event_target_value(&ev))
                            prop:value=move || form.name.get()
                            class="input input-bordered w-full"
                        />
                    </div>
                </div>
                <div class="form-control">
                    <label for="line_color" class="label">
                        <span class="label-text">"标识色"</span>
                    </label>
                    <input id="line_color"
                        type="color"
                        on:input=move |ev| form.color.set(event_target_value(&ev))
                        prop:value=move || form.color.get()
                        class="w-16 h-10"
                    />
                </div>
                <div class="modal-action">
                    <button type="button" class="btn" on:click=move |_| open.set(false)>"取消"</button>
                    <button type="submit" class="btn btn-primary">"保存"</button>
                </div>
            </form>
        </FormDialog>
    }
}

#[component]
pub fn LinesPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let lines = RwSignal::new(Vec::<Line>::new());
    let loading = RwSignal::new(true);

    let load_lines = move || backend.load(ListLinesRequest, lines, loading, notifier);
    load_lines();

    let handle_add = move |req: CreateLineRequest| {
        backend.submit(req, "新增线路失败", notifier, move |created| {
            notifier.success("线路已新增");
            match created {
                Some(line) => lines.update(|list| list.push(line)),
                None => load_lines(),
            }
        });
    };

    let handle_delete = move |id: String| {
        let target = DeleteLineRequest(DeleteTarget { id: id.clone() });
        backend.submit(target, "删除线路失败", notifier, move |_| {
            notifier.success("线路已删除");
            lines.update(|list| list.retain(|l| l.id != id));
        });
    };

    let is_empty = Signal::derive(move || lines.with(Vec::is_empty));

    view! {
        <ConsoleShell title="线路管理">
            <Toast notifier=notifier />
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div>
                            <h3 class="card-title">"全部线路"</h3>
                            <p class="text-base-content/70 text-sm">{move || format!("共 {} 条", lines.with(Vec::len))}</p>
                        </div>
                        <AddLineDialog on_add=handle_add />
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"编号"</th>
                                    <th>"名称"</th>
                                    <th>"状态"</th>
                                    <th class="hidden md:table-cell">"站点数"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <TablePlaceholder colspan=5 loading=loading empty=is_empty empty_text="暂无线路。" />
                                <For
                                    each=move || lines.get()
                                    key=|l| l.id.clone()
                                    children=move |line| {
                                        let id = line.id.clone();
                                        let swatch = format!("background-color: {}", line.color);
                                        view! {
                                            <tr>
                                                <td>
                                                    <div class="flex items-center gap-2 font-mono text-sm font-bold">
                                                        <span class="inline-block w-3 h-3 rounded-full" style=swatch></span>
                                                        {line.code}
                                                    </div>
                                                </td>
                                                <td>{line.name}</td>
                                                <td><div class="badge badge-outline">{line.status.label()}</div></td>
                                                <td class="hidden md:table-cell">{line.station_ids.len()}</td>
                                                <td>
                                                    <button
                                                        class="btn btn-ghost btn-sm text-error"
                                                        on:click=move |_| handle_delete(id.clone())
                                                    >
                                                        "删除"
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </div>
        </ConsoleShell>
    }
}

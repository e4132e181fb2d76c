//! 站点管理页

use leptos::prelude::*;
use metro_shared::{
    CreateStationRequest, DeleteStationRequest, DeleteTarget, Line, ListLinesRequest,
    ListStationsRequest, Station,
};

use crate::components::common::{
    FormDialog, FormError, Notifier, TablePlaceholder, Toast, use_backend,
};
use crate::components::layout::ConsoleShell;

/// 按线路 ID 拼出线路名称，未知 ID 原样展示
fn line_names(lines: &[Line], ids: &[String]) -> String {
    ids.iter()
        .map(|id| {
            lines
                .iter()
                .find(|l| &l.id == id)
                .map_or(id.as_str(), |l| l.name.as_str())
        })
        .collect::<Vec<_>>()
        .join(" / ")
}

#[component]
fn AddStationDialog(
    lines: RwSignal<Vec<Line>>,
    #[prop(into)] on_add: Callback<CreateStationRequest>,
) -> impl IntoView {
    let open = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let code = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let line_id = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = CreateStationRequest {
            code: code.get().trim().to_string(),
            name: name.get().trim().to_string(),
            line_id: line_id.get(),
        };
        if let Err(msg) = req.validate() {
            error.set(Some(msg));
            return;
        }
        error.set(None);
        on_add.run(req);
        open.set(false);
        code.set(String::new());
        name.set(String::new());
        line_id.set(String::new());
    };

    view! {
        <FormDialog button_label="新增站点" title="新增站点" open=open>
            <form on:submit=on_submit class="space-y-4 pt-4">
                <FormError error=error />
                <div class="grid grid-cols-2 gap-4">
                    <div class="form-control">
                        <label for="station_code" class="label">
                            <span class="label-text">"站点编号"</span>
                        </label>
                        <input id="station_code" required
                            type="text"
                            placeholder="S0101"
                            on:input=move |ev| code.set(event_target_value(&ev))
                            prop:value=move || code.get()
                            class="input input-bordered w-full"
                        />
                    </div>
                    <div class="form-control">
                        <label for="station_name" class="label">
                            <span class="label-text">"站点名称"</span>
                        </label>
                        <input id="station_name" required
                            type="text"
                            placeholder="人民广场"
                            on:input=move |ev| name.set(event_target_value(&ev))
                            prop:value=move || name.get()
                            class="input input-bordered w-full"
                        />
                    </div>
                </div>
                <div class="form-control">
                    <label for="station_line" class="label">
                        <span class="label-text">"所属线路"</span>
                    </label>
                    <select id="station_line"
                        class="select select-bordered w-full"
                        on:change=move |ev| line_id.set(event_target_value(&ev))
                        prop:value=move || line_id.get()
                    >
                        <option value="">"请选择"</option>
                        <For
                            each=move || lines.get()
                            key=|l| l.id.clone()
                            children=move |line| view! { <option value=line.id>{line.name}</option> }
                        />
                    </select>
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
pub fn StationsPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let stations = RwSignal::new(Vec::<Station>::new());
    let lines = RwSignal::new(Vec::<Line>::new());
    let loading = RwSignal::new(true);
    let loading_lines = RwSignal::new(true);

    let load_stations = move || backend.load(ListStationsRequest, stations, loading, notifier);
    load_stations();
    backend.load(ListLinesRequest, lines, loading_lines, notifier);

    let handle_add = move |req: CreateStationRequest| {
        backend.submit(req, "新增站点失败", notifier, move |created| {
            notifier.success("站点已新增");
            match created {
                Some(station) => stations.update(|list| list.push(station)),
                None => load_stations(),
            }
        });
    };

    let handle_delete = move |id: String| {
        let target = DeleteStationRequest(DeleteTarget { id: id.clone() });
        backend.submit(target, "删除站点失败", notifier, move |_| {
            notifier.success("站点已删除");
            stations.update(|list| list.retain(|s| s.id != id));
        });
    };

    let is_empty = Signal::derive(move || stations.with(Vec::is_empty));

    view! {
        <ConsoleShell title="站点管理">
            <Toast notifier=notifier />
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div>
                            <h3 class="card-title">"全部站点"</h3>
                            <p class="text-base-content/70 text-sm">{move || format!("共 {} 个", stations.with(Vec::len))}</p>
                        </div>
                        <AddStationDialog lines=lines on_add=handle_add />
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"编号"</th>
                                    <th>"名称"</th>
                                    <th>"所属线路"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <TablePlaceholder colspan=4 loading=loading empty=is_empty empty_text="暂无站点。" />
                                <For
                                    each=move || stations.get()
                                    key=|s| s.id.clone()
                                    children=move |station| {
                                        let id = station.id.clone();
                                        let transfer = station.is_transfer();
                                        let line_ids = station.line_ids.clone();
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm">{station.code}</td>
                                                <td>
                                                    {station.name}
                                                    <Show when=move || transfer>
                                                        <span class="badge badge-accent badge-sm ml-2">"换乘"</span>
                                                    </Show>
                                                </td>
                                                <td class="text-sm opacity-70">
                                                    {move || lines.with(|l| line_names(l, &line_ids))}
                                                </td>
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

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, name: &str) -> Line {
        Line {
            id: id.into(),
            code: id.to_uppercase(),
            name: name.into(),
            color: "#000000".into(),
            status: Default::default(),
            station_ids: Vec::new(),
        }
    }

    #[test]
    fn line_names_resolves_known_ids() {
        let lines = [line("l1", "1号线"), line("l2", "2号线")];
        let ids = vec!["l2".to_string(), "l1".to_string(), "l9".to_string()];
        assert_eq!(line_names(&lines, &ids), "2号线 / 1号线 / l9");
        assert_eq!(line_names(&lines, &[]), "");
    }
}

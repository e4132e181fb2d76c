//! 票务管理页：售票与票务查询

use leptos::prelude::*;
use metro_shared::{
    IssueTicketRequest, ListStationsRequest, ListTicketsRequest, Station, Ticket, TicketType,
    format_amount,
};

use crate::components::common::{
    FormDialog, FormError, Notifier, TablePlaceholder, Toast, use_backend,
};
use crate::components::layout::ConsoleShell;

mod form_state;

use form_state::{IssueForm, parse_ticket_type, ticket_type_value};

/// 站点下拉框
#[component]
fn StationSelect(
    field_id: &'static str,
    label: &'static str,
    stations: RwSignal<Vec<Station>>,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for=field_id class="label">
                <span class="label-text">{label}</span>
            </label>
            <select id=field_id
                class="select select-bordered w-full"
                on:change=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
            >
                <option value="">"请选择"</option>
                <For
                    each=move || stations.get()
                    key=|s| s.id.clone()
                    children=move |s| view! { <option value=s.id>{s.name}</option> }
                />
            </select>
        </div>
    }
}

#[component]
fn IssueTicketDialog(
    stations: RwSignal<Vec<Station>>,
    #[prop(into)] on_issue: Callback<IssueTicketRequest>,
) -> impl IntoView {
    let open = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);
    let form = IssueForm::new();

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = form.to_request();
        if let Err(msg) = req.validate() {
            error.set(Some(msg));
            return;
        }
        error.set(None);
        on_issue.run(req);
        open.set(false);
        form.reset();
    };

    view! {
        <FormDialog button_label="售票" title="售票" open=open>
            <form on:submit=on_submit class="space-y-4 pt-4">
                <FormError error=error />
                <div class="form-control">
                    <label for="ticket_type" class="label">
                        <span class="label-text">"票种"</span>
                    </label>
                    <select id="ticket_type"
                        class="select select-bordered w-full"
                        on:change=move |ev| form.ticket_type.set(parse_ticket_type(&event_target_value(&ev)))
                        prop:value=move || ticket_type_value(form.ticket_type.get())
                    >
                        {TicketType::ALL
                            .into_iter()
                            .map(|t| view! { <option value=ticket_type_value(t)>{t.label()}</option> })
                            .collect_view()}
                    </select>
                </div>
                <div class="grid grid-cols-2 gap-4">
                    <StationSelect field_id="origin" label="起点站" stations=stations value=form.origin />
                    <Show when=move || form.ticket_type.get().requires_destination()>
                        <StationSelect field_id="destination" label="终点站" stations=stations value=form.destination />
                    </Show>
                </div>
                <div class="form-control">
                    <label for="passenger" class="label">
                        <span class="label-text">"乘客编号（可选）"</span>
                    </label>
                    <input id="passenger"
                        type="text"
                        on:input=move |ev| form.passenger.set(event_target_value(&ev))
                        prop:value=move || form.passenger.get()
                        class="input input-bordered w-full"
                    />
                </div>
                <div class="modal-action">
                    <button type="button" class="btn" on:click=move |_| open.set(false)>"取消"</button>
                    <button type="submit" class="btn btn-primary">"出票"</button>
                </div>
            </form>
        </FormDialog>
    }
}

#[component]
pub fn TicketsPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let tickets = RwSignal::new(Vec::<Ticket>::new());
    let stations = RwSignal::new(Vec::<Station>::new());
    let loading = RwSignal::new(true);
    let loading_stations = RwSignal::new(true);

    let load_tickets = move || backend.load(ListTicketsRequest, tickets, loading, notifier);
    load_tickets();
    backend.load(ListStationsRequest, stations, loading_stations, notifier);

    let handle_issue = move |req: IssueTicketRequest| {
        backend.submit(req, "售票失败", notifier, move |issued| match issued {
            Some(ticket) => {
                notifier.success(format!("已出票，票款 {} 元", format_amount(ticket.price_cents)));
                tickets.update(|list| list.insert(0, ticket));
            }
            None => {
                notifier.success("已出票");
                load_tickets();
            }
        });
    };

    let station_name = move |id: &str| {
        stations.with(|all| {
            all.iter()
                .find(|s| s.id == id)
                .map_or_else(|| id.to_string(), |s| s.name.clone())
        })
    };

    let is_empty = Signal::derive(move || tickets.with(Vec::is_empty));

    view! {
        <ConsoleShell title="票务管理">
            <Toast notifier=notifier />
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <div>
                            <h3 class="card-title">"售票记录"</h3>
                            <p class="text-base-content/70 text-sm">{move || format!("共 {} 张", tickets.with(Vec::len))}</p>
                        </div>
                        <IssueTicketDialog stations=stations on_issue=handle_issue />
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"票种"</th>
                                    <th>"行程"</th>
                                    <th>"票款（元）"</th>
                                    <th class="hidden md:table-cell">"出票时间"</th>
                                    <th>"状态"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <TablePlaceholder colspan=5 loading=loading empty=is_empty empty_text="暂无售票记录。" />
                                <For
                                    each=move || tickets.get()
                                    key=|t| t.id.clone()
                                    children=move |ticket| {
                                        let origin = ticket.origin_station_id.clone();
                                        let destination = ticket.destination_station_id.clone();
                                        let route = move || match &destination {
                                            Some(dest) => format!("{} → {}", station_name(&origin), station_name(dest)),
                                            None => station_name(&origin),
                                        };
                                        view! {
                                            <tr>
                                                <td>{ticket.ticket_type.label()}</td>
                                                <td>{route}</td>
                                                <td class="font-mono">{format_amount(ticket.price_cents)}</td>
                                                <td class="hidden md:table-cell text-sm">{ticket.issued_at.to_display()}</td>
                                                <td><div class="badge badge-outline">{ticket.status.label()}</div></td>
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

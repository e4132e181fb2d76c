use leptos::prelude::*;
use metro_shared::{ListPassengersRequest, Passenger};

use crate::components::common::{Notifier, TablePlaceholder, Toast, use_backend};
use crate::components::layout::ConsoleShell;

/// 按姓名、邮箱或卡号做不区分大小写的包含匹配
fn matches_query(passenger: &Passenger, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    [
        Some(passenger.full_name.as_str()),
        passenger.email.as_deref(),
        passenger.card_number.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&query))
}

#[component]
pub fn PassengersPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let passengers = RwSignal::new(Vec::<Passenger>::new());
    let loading = RwSignal::new(true);
    let (query, set_query) = signal(String::new());

    backend.load(ListPassengersRequest, passengers, loading, notifier);

    let visible = move || {
        let query = query.get();
        passengers.with(|all| {
            all.iter()
                .filter(|p| matches_query(p, &query))
                .cloned()
                .collect::<Vec<_>>()
        })
    };
    let is_empty = Signal::derive(move || visible().is_empty());

    view! {
        <ConsoleShell title="乘客管理">
            <Toast notifier=notifier />
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2 gap-4">
                        <h3 class="card-title">"登记乘客"</h3>
                        <input
                            type="search"
                            placeholder="姓名 / 邮箱 / 卡号"
                            on:input=move |ev| set_query.set(event_target_value(&ev))
                            prop:value=query
                            class="input input-bordered input-sm w-full max-w-xs"
                        />
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"姓名"</th>
                                    <th class="hidden md:table-cell">"邮箱"</th>
                                    <th>"卡号"</th>
                                    <th>"登记时间"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <TablePlaceholder colspan=4 loading=loading empty=is_empty empty_text="没有匹配的乘客。" />
                                <For
                                    each=visible
                                    key=|p| p.id.clone()
                                    children=move |p| view! {
                                        <tr>
                                            <td class="font-bold">{p.full_name}</td>
                                            <td class="hidden md:table-cell opacity-70">{p.email.unwrap_or_else(|| "-".to_string())}</td>
                                            <td class="font-mono text-sm">{p.card_number.unwrap_or_else(|| "-".to_string())}</td>
                                            <td class="text-sm">{p.registered_at.to_display()}</td>
                                        </tr>
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

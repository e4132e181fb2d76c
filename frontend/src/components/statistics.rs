use leptos::prelude::*;
use metro_shared::{StatisticsSummary, StatisticsSummaryRequest, format_amount};

use crate::components::common::{Notifier, TablePlaceholder, Toast, use_backend};
use crate::components::dashboard::StatCard;
use crate::components::layout::ConsoleShell;

#[component]
pub fn StatisticsPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let summary = RwSignal::new(StatisticsSummary::default());
    let loading = RwSignal::new(true);

    let load_summary = move || backend.load(StatisticsSummaryRequest, summary, loading, notifier);
    load_summary();

    // 每行：线路 ID, 名称, 客流, 占比
    let rows = move || {
        summary.with(|s| {
            s.line_ridership
                .iter()
                .map(|l| (l.line_id.clone(), l.line_name.clone(), l.riders, s.ridership_share(l)))
                .collect::<Vec<_>>()
        })
    };
    let is_empty = Signal::derive(move || summary.with(|s| s.line_ridership.is_empty()));

    view! {
        <ConsoleShell title="运营统计">
            <Toast notifier=notifier />
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatCard title="累计乘客" value=Signal::derive(move || summary.with(|s| s.total_passengers.to_string())) />
                <StatCard title="今日售票" value=Signal::derive(move || summary.with(|s| s.tickets_sold_today.to_string())) />
                <StatCard
                    title="今日收入（元）"
                    value=Signal::derive(move || summary.with(|s| format_amount(s.revenue_today_cents)))
                    value_class="stat-value text-success"
                />
                <StatCard
                    title="运营线路"
                    value=Signal::derive(move || summary.with(|s| s.active_lines.to_string()))
                    value_class="stat-value text-secondary"
                />
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <h3 class="card-title">"线路客流分布"</h3>
                        <button
                            on:click=move |_| load_summary()
                            disabled=move || loading.get()
                            class="btn btn-ghost btn-sm"
                        >
                            "刷新"
                        </button>
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table w-full">
                            <thead>
                                <tr>
                                    <th>"线路"</th>
                                    <th>"客流"</th>
                                    <th>"占比"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <TablePlaceholder colspan=3 loading=loading empty=is_empty empty_text="暂无客流数据。" />
                                <For
                                    each=rows
                                    key=|(id, _, riders, share)| (id.clone(), *riders, *share)
                                    children=move |(_, name, riders, share)| view! {
                                        <tr>
                                            <td class="font-bold">{name}</td>
                                            <td>{riders}</td>
                                            <td>
                                                <div class="flex items-center gap-2">
                                                    <progress class="progress progress-primary w-32" value=share.to_string() max="100"></progress>
                                                    <span class="text-sm">{format!("{share}%")}</span>
                                                </div>
                                            </td>
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

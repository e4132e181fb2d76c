use crate::auth::use_session;
use crate::components::common::{Notifier, Toast, use_backend};
use crate::components::layout::ConsoleShell;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use metro_shared::{
    Line, LineStatus, ListLinesRequest, ListStationsRequest, ListTicketsRequest, Station,
    StatisticsSummary, StatisticsSummaryRequest, Ticket, TicketStatus, format_amount,
};

/// 统计卡片
#[component]
pub fn StatCard(
    title: &'static str,
    #[prop(into)] value: Signal<String>,
    #[prop(optional)] desc: &'static str,
    #[prop(default = "stat-value text-primary")] value_class: &'static str,
) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class=value_class>{move || value.get()}</div>
            <div class="stat-desc">{desc}</div>
        </div>
    }
}

/// 快捷入口卡片
#[component]
fn Shortcut(to: AppRoute, desc: &'static str) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">{to.title()}</h3>
                <p class="text-base-content/70 text-sm">{desc}</p>
                <div class="card-actions justify-end">
                    <Link to=to class="btn btn-primary btn-sm">"进入"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let summary = RwSignal::new(StatisticsSummary::default());
    let loading = RwSignal::new(true);

    backend.load(StatisticsSummaryRequest, summary, loading, notifier);

    let busiest = move || {
        summary.with(|s| {
            s.busiest_line()
                .map(|l| l.line_name.clone())
                .unwrap_or_else(|| "-".to_string())
        })
    };

    view! {
        <ConsoleShell title="管理概览">
            <Toast notifier=notifier />
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatCard title="累计乘客" value=Signal::derive(move || summary.with(|s| s.total_passengers.to_string())) />
                <StatCard title="今日售票" value=Signal::derive(move || summary.with(|s| s.tickets_sold_today.to_string())) />
                <StatCard
                    title="今日收入（元）"
                    value=Signal::derive(move || summary.with(|s| format_amount(s.revenue_today_cents)))
                    value_class="stat-value text-success"
                />
                <StatCard title="客流最高线路" value=Signal::derive(busiest) value_class="stat-value text-secondary text-2xl" />
            </div>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                <Shortcut to=AppRoute::Staff desc="查看员工账号与角色" />
                <Shortcut to=AppRoute::Lines desc="维护线路信息" />
                <Shortcut to=AppRoute::Statistics desc="按线路查看客流分布" />
            </div>
        </ConsoleShell>
    }
}

#[component]
pub fn OperatorDashboardPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let lines = RwSignal::new(Vec::<Line>::new());
    let stations = RwSignal::new(Vec::<Station>::new());
    let loading_lines = RwSignal::new(true);
    let loading_stations = RwSignal::new(true);

    backend.load(ListLinesRequest, lines, loading_lines, notifier);
    backend.load(ListStationsRequest, stations, loading_stations, notifier);

    let operational = move || {
        lines.with(|l| {
            l.iter()
                .filter(|line| line.status == LineStatus::Operational)
                .count()
        })
    };
    let transfers = move || stations.with(|s| s.iter().filter(|st| st.is_transfer()).count());

    view! {
        <ConsoleShell title="调度概览">
            <Toast notifier=notifier />
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatCard title="线路总数" value=Signal::derive(move || lines.with(|l| l.len()).to_string()) />
                <StatCard
                    title="运营中"
                    value=Signal::derive(move || operational().to_string())
                    value_class="stat-value text-success"
                />
                <StatCard title="站点总数" value=Signal::derive(move || stations.with(|s| s.len()).to_string()) />
                <StatCard
                    title="换乘站"
                    value=Signal::derive(move || transfers().to_string())
                    value_class="stat-value text-secondary"
                />
            </div>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <Shortcut to=AppRoute::Lines desc="新增或停用线路" />
                <Shortcut to=AppRoute::Stations desc="维护站点与所属线路" />
            </div>
        </ConsoleShell>
    }
}

#[component]
pub fn TicketAgentDashboardPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let tickets = RwSignal::new(Vec::<Ticket>::new());
    let loading = RwSignal::new(true);

    backend.load(ListTicketsRequest, tickets, loading, notifier);

    let active = move || {
        tickets.with(|t| {
            t.iter()
                .filter(|ticket| ticket.status == TicketStatus::Active)
                .count()
        })
    };
    let revenue = move || tickets.with(|t| format_amount(t.iter().map(|x| x.price_cents).sum()));

    view! {
        <ConsoleShell title="售票概览">
            <Toast notifier=notifier />
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <StatCard title="已售票数" value=Signal::derive(move || tickets.with(|t| t.len()).to_string()) />
                <StatCard
                    title="有效票"
                    value=Signal::derive(move || active().to_string())
                    value_class="stat-value text-success"
                />
                <StatCard title="票款合计（元）" value=Signal::derive(revenue) value_class="stat-value text-secondary" />
            </div>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <Shortcut to=AppRoute::Tickets desc="售票与票务查询" />
                <Shortcut to=AppRoute::Passengers desc="查看登记乘客" />
            </div>
        </ConsoleShell>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let session = use_session();

    let field = move |f: fn(&metro_shared::StaffUser) -> String| {
        move || session.user().map(|u| f(&u)).unwrap_or_default()
    };

    view! {
        <ConsoleShell title="个人信息">
            <div class="card bg-base-100 shadow-xl max-w-xl">
                <div class="card-body">
                    <dl class="grid grid-cols-3 gap-y-2">
                        <dt class="font-bold">"用户名"</dt>
                        <dd class="col-span-2">{field(|u| u.username.clone())}</dd>
                        <dt class="font-bold">"邮箱"</dt>
                        <dd class="col-span-2">{field(|u| u.email.clone().unwrap_or_else(|| "-".to_string()))}</dd>
                        <dt class="font-bold">"角色"</dt>
                        <dd class="col-span-2">{move || session.role().label()}</dd>
                        <dt class="font-bold">"员工编号"</dt>
                        <dd class="col-span-2 font-mono">{field(|u| u.id.clone())}</dd>
                    </dl>
                </div>
            </div>
        </ConsoleShell>
    }
}

use leptos::prelude::*;
use metro_shared::{ListStaffRequest, StaffUser};

use crate::components::common::{Notifier, TablePlaceholder, Toast, use_backend};
use crate::components::layout::ConsoleShell;

#[component]
pub fn StaffPage() -> impl IntoView {
    let backend = use_backend();
    let notifier = Notifier::new();
    let staff = RwSignal::new(Vec::<StaffUser>::new());
    let loading = RwSignal::new(true);

    let load_staff = move || backend.load(ListStaffRequest, staff, loading, notifier);
    load_staff();

    let is_empty = Signal::derive(move || staff.with(Vec::is_empty));

    view! {
        <ConsoleShell title="员工管理">
            <Toast notifier=notifier />
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <h3 class="card-title">"员工账号"</h3>
                        <button
                            on:click=move |_| load_staff()
                            disabled=move || loading.get()
                            class="btn btn-ghost btn-sm"
                        >
                            "刷新"
                        </button>
                    </div>
                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"用户名"</th>
                                    <th>"邮箱"</th>
                                    <th>"角色"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <TablePlaceholder colspan=3 loading=loading empty=is_empty empty_text="暂无员工。" />
                                <For
                                    each=move || staff.get()
                                    key=|s| s.id.clone()
                                    children=move |member| {
                                        let badge = if member.role.is_admin() {
                                            "badge badge-primary"
                                        } else {
                                            "badge badge-ghost"
                                        };
                                        view! {
                                            <tr>
                                                <td class="font-bold">{member.username}</td>
                                                <td class="opacity-70">{member.email.unwrap_or_else(|| "-".to_string())}</td>
                                                <td><span class=badge>{member.role.label()}</span></td>
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

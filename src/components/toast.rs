//! Toast Component
//!
//! Short-lived notice at the top of the page.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use fridge_core::sync::{Notice, NoticeKind};

use crate::store::{store_hide_notice, store_show_notice, use_dashboard_store, DashboardStateStoreFields, DashboardStore};

pub const NOTICE_DURATION_MS: u32 = 3_000;

/// Show `notice` and hide it again after a few seconds
pub fn show_notice(store: DashboardStore, notice: Notice) {
    let serial = store_show_notice(&store, notice);
    Timeout::new(NOTICE_DURATION_MS, move || store_hide_notice(&store, serial)).forget();
}

#[component]
pub fn Toast() -> impl IntoView {
    let dashboard = use_dashboard_store();

    view! {
        {move || dashboard.notice().get().map(|notice| {
            let class = match notice.kind {
                NoticeKind::Success => "toast toast-success",
                NoticeKind::Error => "toast toast-error",
            };
            view! { <div class=class role="status">{notice.text}</div> }
        })}
    }
}

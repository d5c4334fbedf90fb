//! Expiry Alert Component
//!
//! Overdue and soon-expiring items across all fridges. Hidden when empty.

use leptos::prelude::*;

use fridge_core::domain::date;
use fridge_core::FridgeItem;

use crate::store::{use_dashboard_store, DashboardStateStoreFields};

fn alert_line(item: &FridgeItem) -> impl IntoView {
    let when = date::to_alert_display(&date::format_canonical(item.expiration_date));
    view! {
        <li>
            <span class="item-name">{item.name.clone()}</span>
            {format!(" – SKT {} (Dolap {})", when, item.fridge_id.number())}
        </li>
    }
}

#[component]
pub fn ExpiryAlert() -> impl IntoView {
    let dashboard = use_dashboard_store();

    view! {
        <Show when=move || !dashboard.expiry().get().is_empty()>
            <div class="expiry-alert">
                <Show when=move || !dashboard.expiry().get().overdue.is_empty()>
                    <div class="expiry-group overdue">
                        <div class="expiry-title">
                            {move || format!(
                                "Son Kullanma Tarihi GEÇMİŞ Ürünler ({})",
                                dashboard.expiry().get().overdue.len(),
                            )}
                        </div>
                        <div class="expiry-hint">
                            "Bu ürünleri hemen buzdolabından çıkarın ve uygulamadan silin!"
                        </div>
                        <ul>
                            {move || dashboard.expiry().get().overdue.iter().map(alert_line).collect_view()}
                        </ul>
                    </div>
                </Show>
                <Show when=move || !dashboard.expiry().get().upcoming.is_empty()>
                    <div class="expiry-group upcoming">
                        <div class="expiry-title">
                            {move || format!(
                                "Son Kullanma Tarihi Yaklaşan Ürünler ({})",
                                dashboard.expiry().get().upcoming.len(),
                            )}
                        </div>
                        <ul>
                            {move || dashboard.expiry().get().upcoming.iter().map(alert_line).collect_view()}
                        </ul>
                    </div>
                </Show>
            </div>
        </Show>
    }
}

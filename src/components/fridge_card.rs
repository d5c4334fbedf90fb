//! Fridge Card Component
//!
//! Title, actions and fill bar of one fridge.

use leptos::prelude::*;

use fridge_core::sync::FridgeCard;
use fridge_core::FridgeId;

use crate::context::use_app_context;
use crate::store::{use_dashboard_store, DashboardStateStoreFields};

#[component]
pub fn FridgeCardView(fridge: FridgeId) -> impl IntoView {
    let ctx = use_app_context();
    let dashboard = use_dashboard_store();

    let card = Memo::new(move |_| {
        dashboard
            .cards()
            .get()
            .into_iter()
            .find(|c| c.fridge == fridge)
            .unwrap_or_else(|| FridgeCard::new(fridge, 0))
    });

    view! {
        <div class="fridge-card">
            <div class="fridge-card-head">
                <h2>{fridge.title()}</h2>
                <div class="fridge-card-actions">
                    <button class="add-btn" on:click=move |_| ctx.open_add_form(fridge)>
                        "Ekle"
                    </button>
                    <a class="qr-btn" href=format!("/qr/{}", fridge.number())>"QR"</a>
                </div>
            </div>
            <div class="fill">
                <div class="fill-label">
                    <span>"Doluluk"</span>
                    <span>
                        {move || {
                            let c = card.get();
                            format!("{}/{} (%{})", c.count, c.capacity, c.percent)
                        }}
                    </span>
                </div>
                <div class="fill-bar">
                    <div class="fill-bar-value" style:width=move || format!("{}%", card.get().percent)></div>
                </div>
            </div>
        </div>
    }
}

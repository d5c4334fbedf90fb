//! Fridge Tracker Frontend App
//!
//! Two views switched on the path: the dashboard at `/` and the QR page at
//! `/qr/N`.

use leptos::prelude::*;
use reactive_stores::Store;

use fridge_core::repository::SubscriptionHandle;
use fridge_core::sync::{deep_link, ExpiryAlerts, FridgeSummary, MountedView};
use fridge_core::{FridgeId, StoreConfig};

use crate::commands;
use crate::components::{AddItemModal, ExpiryAlert, FridgeCardView, InventoryList, ProfileHeader, QrView, Toast};
use crate::context::{use_app_context, AppContext, Services};
use crate::store::{store_set_cards, store_set_expiry, DashboardState};

#[component]
pub fn App(config: StoreConfig) -> impl IntoView {
    provide_context(AppContext::new(Services::connect(config)));

    match deep_link::qr_path_fridge(&commands::current_path()) {
        Some(fridge) => view! { <QrView fridge=fridge /> }.into_any(),
        None => view! { <Dashboard /> }.into_any(),
    }
}

/// Page-level controllers; kept alive for as long as the dashboard is
struct PageControllers {
    _summary: FridgeSummary,
    _expiry: ExpiryAlerts,
    _summary_mount: SubscriptionHandle,
    _expiry_mount: MountedView,
}

#[component]
fn Dashboard() -> impl IntoView {
    let services = use_app_context().services();
    let store = Store::new(DashboardState::new());
    provide_context(store);

    let summary = FridgeSummary::new(services.store.clone(), services.bus.clone(), services.spawner.clone());
    summary.on_render(move |cards| store_set_cards(&store, cards));
    let expiry = ExpiryAlerts::new(services.store, services.feed, services.bus, services.spawner, services.today);
    expiry.on_render(move |buckets| store_set_expiry(&store, buckets));

    let controllers = StoredValue::new_local(Some(PageControllers {
        _summary_mount: summary.mount(),
        _expiry_mount: expiry.mount(),
        _summary: summary,
        _expiry: expiry,
    }));
    on_cleanup(move || controllers.update_value(|c| drop(c.take())));

    view! {
        <div class="page">
            <ProfileHeader />

            <div class="fridge-cards">
                {FridgeId::ALL.iter().map(|f| view! { <FridgeCardView fridge=*f /> }).collect_view()}
            </div>

            <div class="inventories">
                {FridgeId::ALL
                    .iter()
                    .map(|f| {
                        view! {
                            <section class="inventory">
                                <h3>{format!("{} Stoğu", f.title())}</h3>
                                <div class="inventory-scroll">
                                    <InventoryList fridge=*f />
                                </div>
                            </section>
                        }
                    })
                    .collect_view()}
            </div>

            <ExpiryAlert />
            <AddItemModal />
            <Toast />
        </div>
    }
}

//! Inventory List Component
//!
//! Item table of one fridge, kept live by an `InventorySync` controller.

use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

use fridge_core::domain::date;
use fridge_core::sync::{InventorySync, Notice};
use fridge_core::{FridgeId, FridgeItem};

use crate::components::{show_notice, RemoveButton};
use crate::context::use_app_context;
use crate::store::use_dashboard_store;

#[component]
pub fn InventoryList(fridge: FridgeId) -> impl IntoView {
    let services = use_app_context().services();
    let dashboard = use_dashboard_store();

    let sync = InventorySync::new(fridge, services.store, services.feed, services.bus, services.spawner);
    let (snapshot, set_snapshot) = signal(sync.snapshot());
    sync.on_render(move |s| set_snapshot.set(s.clone()));

    let mounted = StoredValue::new_local(Some(sync.mount()));
    let controller = StoredValue::new_local(sync);
    on_cleanup(move || {
        mounted.update_value(|m| {
            if let Some(view) = m.take() {
                view.release();
            }
        });
    });

    let remove = move |id: Uuid| {
        let sync = controller.get_value();
        spawn_local(async move {
            if let Err(message) = sync.delete(id).await {
                show_notice(dashboard, Notice::error(format!("Silme işlemi başarısız: {}", message)));
            }
        });
    };

    view! {
        {move || {
            let snap = snapshot.get();
            if snap.is_loading() {
                view! { <div class="inventory-status">"Yükleniyor…"</div> }.into_any()
            } else if snap.items.is_empty() {
                view! { <div class="inventory-status">"Kayıt bulunamadı."</div> }.into_any()
            } else {
                view! {
                    <table class="inventory-table">
                        <thead>
                            <tr>
                                <th>"Ad"</th>
                                <th>"SKT"</th>
                                <th>"Raf"</th>
                                <th>"Pozisyon"</th>
                                <th>"Ortak?"</th>
                                <th>"Ekleyen"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {snap.items.into_iter().map(|item| inventory_row(item, remove)).collect_view()}
                        </tbody>
                    </table>
                }
                .into_any()
            }
        }}
    }
}

fn inventory_row(item: FridgeItem, remove: impl Fn(Uuid) + Copy + Send + Sync + 'static) -> impl IntoView {
    let id = item.id;
    let expires = date::to_display(&date::format_canonical(item.expiration_date));
    view! {
        <tr>
            <td>{item.name}</td>
            <td>{expires}</td>
            <td>{item.location_shelf}</td>
            <td>{item.location_position.label()}</td>
            <td>{if item.is_common_use { "Evet" } else { "Hayır" }}</td>
            <td>{item.added_by}</td>
            <td>
                <RemoveButton label="Çıkar" on_confirm=Callback::new(move |_| remove(id)) />
            </td>
        </tr>
    }
}

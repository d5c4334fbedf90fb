//! Add Item Modal Component
//!
//! Form for adding an item to a fridge. Opens from a fridge card's "Ekle"
//! button or from a QR deep link; all state lives in `AddItemForm`.

use leptos::prelude::*;
use leptos::task::spawn_local;

use fridge_core::sync::{AddItemForm, SubmitOutcome};
use fridge_core::{FridgeId, Position};

use crate::commands;
use crate::components::show_notice;
use crate::context::use_app_context;
use crate::store::use_dashboard_store;

fn replace_address(address: &str) {
    if let Err(e) = commands::replace_address(address) {
        log::warn!("[FORM] could not replace address: {}", e);
    }
}

#[component]
pub fn AddItemModal() -> impl IntoView {
    let services = use_app_context().services();
    let dashboard = use_dashboard_store();

    let form = AddItemForm::new(services.store, services.bus);
    let (snapshot, set_snapshot) = signal(form.snapshot());
    form.on_render(move |s| set_snapshot.set(s.clone()));

    let listening = StoredValue::new_local(Some(form.mount()));
    form.open_from_address(&commands::current_path(), &commands::current_query());
    let form = StoredValue::new_local(form);
    on_cleanup(move || listening.update_value(|l| drop(l.take())));

    let close = move || {
        if let Some(address) = form.with_value(|f| f.close()) {
            replace_address(&address);
        }
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = form.get_value();
        spawn_local(async move {
            match form.submit().await {
                SubmitOutcome::Ignored => {}
                SubmitOutcome::Rejected(notice) | SubmitOutcome::Failed(notice) => show_notice(dashboard, notice),
                SubmitOutcome::Created { notice, address } => {
                    if let Some(address) = address {
                        replace_address(&address);
                    }
                    show_notice(dashboard, notice);
                }
            }
        });
    };

    view! {
        <Show when=move || snapshot.get().open>
            <div class="modal-backdrop">
                <div class="modal">
                    <div class="modal-head">
                        <h3>"Ürün Ekle"</h3>
                        <button type="button" class="close-btn" on:click=move |_| close()>
                            "Kapat"
                        </button>
                    </div>
                    <form class="add-item-form" on:submit=submit>
                        <label class="wide">
                            <span>"Gıda Adı"</span>
                            <input
                                required
                                prop:value=move || snapshot.get().fields.name
                                on:input=move |ev| form.with_value(|f| f.set_name(&event_target_value(&ev)))
                            />
                        </label>
                        <label>
                            <span>"Dolap"</span>
                            <select
                                prop:value=move || snapshot.get().fields.fridge.number().to_string()
                                on:change=move |ev| {
                                    if let Some(fridge) = FridgeId::parse(&event_target_value(&ev)) {
                                        form.with_value(|f| f.set_fridge(fridge));
                                    }
                                }
                            >
                                {FridgeId::ALL
                                    .iter()
                                    .map(|f| view! { <option value=f.number().to_string()>{f.title()}</option> })
                                    .collect_view()}
                            </select>
                        </label>
                        <label>
                            <span>"Son Kullanma Tarihi"</span>
                            <input
                                required
                                type="text"
                                inputmode="numeric"
                                placeholder="gg/aa/yyyy"
                                prop:value=move || snapshot.get().fields.date_input
                                on:input=move |ev| {
                                    let complaint = form.with_value(|f| f.set_date_input(&event_target_value(&ev)));
                                    if let Some(notice) = complaint {
                                        show_notice(dashboard, notice);
                                    }
                                }
                            />
                        </label>
                        <label>
                            <span>"Raf Numarası"</span>
                            <input
                                type="text"
                                inputmode="numeric"
                                placeholder="1"
                                prop:value=move || match snapshot.get().fields.shelf {
                                    0 => String::new(),
                                    shelf => shelf.to_string(),
                                }
                                on:input=move |ev| form.with_value(|f| f.set_shelf_input(&event_target_value(&ev)))
                            />
                        </label>
                        <label>
                            <span>"Pozisyon"</span>
                            <select
                                prop:value=move || snapshot.get().fields.position.index().to_string()
                                on:change=move |ev| {
                                    let chosen = event_target_value(&ev)
                                        .parse::<usize>()
                                        .ok()
                                        .and_then(|i| Position::ALL.get(i).copied());
                                    if let Some(position) = chosen {
                                        form.with_value(|f| f.set_position(position));
                                    }
                                }
                            >
                                {Position::ALL
                                    .iter()
                                    .map(|p| view! { <option value=p.index().to_string()>{p.label()}</option> })
                                    .collect_view()}
                            </select>
                        </label>
                        <label class="wide check">
                            <input
                                type="checkbox"
                                prop:checked=move || snapshot.get().fields.is_common_use
                                on:change=move |ev| form.with_value(|f| f.set_common_use(event_target_checked(&ev)))
                            />
                            <span>"Ortak tüketime açık"</span>
                        </label>
                        <label class="wide">
                            <span>"Kullanıcı Adı"</span>
                            <input
                                required
                                prop:value=move || snapshot.get().fields.added_by
                                on:input=move |ev| form.with_value(|f| f.set_added_by(&event_target_value(&ev)))
                            />
                        </label>
                        <div class="wide">
                            <button type="submit" class="submit-btn" disabled=move || snapshot.get().submitting>
                                {move || if snapshot.get().submitting { "Ekleniyor…" } else { "Ekle" }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}

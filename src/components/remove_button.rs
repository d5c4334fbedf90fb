//! Remove Button Component
//!
//! Row action that asks once before removing an item.

use leptos::prelude::*;

/// Shows `label`; a click turns it into "Emin misiniz?" with ✓/✗.
///
/// `on_confirm` runs on ✓, after which the button resets.
#[component]
pub fn RemoveButton(#[prop(into)] label: String, #[prop(into)] on_confirm: Callback<()>) -> impl IntoView {
    let (asking, set_asking) = signal(false);

    let ask = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        set_asking.set(true);
    };
    let answer = move |ev: web_sys::MouseEvent, confirmed: bool| {
        ev.stop_propagation();
        set_asking.set(false);
        if confirmed {
            on_confirm.run(());
        }
    };

    view! {
        <Show
            when=move || asking.get()
            fallback=move || view! { <button class="remove-btn" on:click=ask>{label.clone()}</button> }
        >
            <span class="remove-confirm">
                <span class="remove-confirm-text">"Emin misiniz?"</span>
                <button class="confirm-btn" on:click=move |ev| answer(ev, true)>"✓"</button>
                <button class="cancel-btn" on:click=move |ev| answer(ev, false)>"✗"</button>
            </span>
        </Show>
    }
}

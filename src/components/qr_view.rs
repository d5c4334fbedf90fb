//! QR View Component
//!
//! `/qr/N`: the add-form deep link to print on a fridge.

use leptos::prelude::*;

use fridge_core::sync::deep_link;
use fridge_core::FridgeId;

use crate::commands;

#[component]
pub fn QrView(fridge: Option<FridgeId>) -> impl IntoView {
    let Some(fridge) = fridge else {
        return view! { <div class="qr-page qr-error">"Geçersiz dolap numarası."</div> }.into_any();
    };

    let link = deep_link::add_form_link(&commands::current_origin(), fridge);
    view! {
        <div class="qr-page">
            <h1>{format!("{} - Ürün Ekle QR", fridge.title())}</h1>
            <code class="qr-link">{link.clone()}</code>
            <p class="qr-hint">"Bu QR’ı dolap üzerine yapıştırın. Taratıldığında ekleme formunu açar."</p>
            <a class="open-link" href=link target="_blank" rel="noopener noreferrer">"Linki Aç"</a>
        </div>
    }
    .into_any()
}

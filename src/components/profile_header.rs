//! Profile Header Component
//!
//! Household card with the shared-use rules.

use leptos::prelude::*;

const RULES: &[&str] = &[
    "Tarihi geçmiş ürünleri buzdolabından çıkarınız ve uygulama üzerinden güncelleyiniz.",
    "Ürün eklerken doğru dolabı seçiniz (Buzdolabı 1, 2 veya Ortak dolap).",
    "Bozulmaya yakın veya kokan ürünleri atınız ve stok bilgisini güncelleyiniz.",
];

#[component]
pub fn ProfileHeader() -> impl IntoView {
    view! {
        <div class="profile-header">
            <div class="profile-identity">
                <div class="profile-avatar">"B"</div>
                <div>
                    <div class="profile-title">"BUZDOLABI"</div>
                    <div class="profile-subtitle">"Ortak sorumluluk ve kullanım talimatları"</div>
                </div>
            </div>
            <ul class="profile-rules">
                {RULES.iter().map(|rule| view! { <li>{*rule}</li> }).collect_view()}
            </ul>
        </div>
    }
}

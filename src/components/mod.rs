//! UI Components
//!
//! Leptos components of the dashboard and the QR page.

mod profile_header;
mod fridge_card;
mod inventory_list;
mod remove_button;
mod expiry_alert;
mod add_item_modal;
mod toast;
mod qr_view;

pub use profile_header::ProfileHeader;
pub use fridge_card::FridgeCardView;
pub use inventory_list::InventoryList;
pub use remove_button::RemoveButton;
pub use expiry_alert::ExpiryAlert;
pub use add_item_modal::AddItemModal;
pub use toast::{show_notice, Toast};
pub use qr_view::QrView;

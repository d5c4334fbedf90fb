//! Add-Item Form Controller
//!
//! Owns the add-item modal: its visibility, the field values, validation
//! and submission. Validation runs in a fixed order and the first failure
//! wins; nothing reaches the store until every check passes.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use super::bus::{PageBus, PageEvent};
use super::deep_link;
use crate::domain::{date, FridgeId, NewFridgeItem, Position};
use crate::repository::{ItemStore, SubscriptionHandle};

pub const MSG_NAME_REQUIRED: &str = "Lütfen gıda adını girin!";
pub const MSG_DATE_REQUIRED: &str = "Lütfen geçerli bir son kullanma tarihi girin!";
pub const MSG_SHELF_INVALID: &str = "Lütfen geçerli bir raf numarası girin (minimum 1)!";
pub const MSG_ADDED_BY_REQUIRED: &str = "Lütfen kullanıcı adını girin!";
pub const MSG_DATE_MALFORMED: &str = "Geçersiz tarih! Lütfen gg/aa/yyyy formatında geçerli bir tarih girin.";
pub const MSG_CREATED: &str = "Ürün başarıyla eklendi!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A toast for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }
}

/// Current field values
#[derive(Debug, Clone, PartialEq)]
pub struct FormFields {
    pub fridge: FridgeId,
    pub name: String,
    /// Masked `dd/mm/yyyy` text as shown in the input
    pub date_input: String,
    /// Set only while `date_input` parses
    pub expiration: Option<NaiveDate>,
    pub is_common_use: bool,
    /// 0 when the input is empty
    pub shelf: u32,
    pub position: Position,
    pub added_by: String,
}

impl FormFields {
    pub fn for_fridge(fridge: FridgeId) -> Self {
        Self {
            fridge,
            name: String::new(),
            date_input: String::new(),
            expiration: None,
            is_common_use: false,
            shelf: 1,
            position: Position::Left,
            added_by: String::new(),
        }
    }
}

/// Run the checks in order; the first failure wins
pub fn validate(fields: &FormFields) -> Result<NewFridgeItem, Notice> {
    if fields.name.trim().is_empty() {
        return Err(Notice::error(MSG_NAME_REQUIRED));
    }
    let expiration_date = fields.expiration.ok_or_else(|| Notice::error(MSG_DATE_REQUIRED))?;
    if fields.shelf < 1 {
        return Err(Notice::error(MSG_SHELF_INVALID));
    }
    if fields.added_by.trim().is_empty() {
        return Err(Notice::error(MSG_ADDED_BY_REQUIRED));
    }

    Ok(NewFridgeItem {
        fridge_id: fields.fridge,
        name: fields.name.trim().to_string(),
        expiration_date,
        is_common_use: fields.is_common_use,
        location_shelf: fields.shelf,
        location_position: fields.position,
        added_by: fields.added_by.trim().to_string(),
    })
}

/// Shelf input keeps its digits only; empty means 0
pub fn parse_shelf_input(raw: &str) -> u32 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

/// How the modal got opened, which decides what closing it does
#[derive(Debug, Clone, PartialEq, Eq)]
enum Opener {
    /// Deep link; the address must lose its parameters on close
    Url { path: String, query: String },
    /// In-page "Add" button
    Event,
}

/// What the modal renders
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    pub open: bool,
    pub submitting: bool,
    pub fields: FormFields,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submit was already in flight
    Ignored,
    /// Validation failed, nothing was sent
    Rejected(Notice),
    /// The store refused; the form stays open and filled
    Failed(Notice),
    /// Stored; the modal is closed. `address` is set when the shell must
    /// replace the current address (deep-link parameters stripped).
    Created { notice: Notice, address: Option<String> },
}

struct FormState {
    opener: Option<Opener>,
    submitting: bool,
    fields: FormFields,
}

struct Inner {
    store: Rc<dyn ItemStore>,
    bus: PageBus,
    state: RefCell<FormState>,
    render: RefCell<Option<Rc<dyn Fn(&FormSnapshot)>>>,
}

#[derive(Clone)]
pub struct AddItemForm {
    inner: Rc<Inner>,
}

impl AddItemForm {
    pub fn new(store: Rc<dyn ItemStore>, bus: PageBus) -> Self {
        Self {
            inner: Rc::new(Inner {
                store,
                bus,
                state: RefCell::new(FormState {
                    opener: None,
                    submitting: false,
                    fields: FormFields::for_fridge(FridgeId::default()),
                }),
                render: RefCell::new(None),
            }),
        }
    }

    pub fn on_render(&self, hook: impl Fn(&FormSnapshot) + 'static) {
        *self.inner.render.borrow_mut() = Some(Rc::new(hook));
    }

    /// Listen for in-page open requests
    pub fn mount(&self) -> SubscriptionHandle {
        let weak = Rc::downgrade(&self.inner);
        self.inner.bus.subscribe(move |event| {
            if let (PageEvent::OpenAddForm(fridge), Some(inner)) = (event, weak.upgrade()) {
                AddItemForm { inner }.open_for(fridge);
            }
        })
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.inner.state.borrow();
        FormSnapshot { open: state.opener.is_some(), submitting: state.submitting, fields: state.fields.clone() }
    }

    /// Open from the current address if it carries `add=1`.
    ///
    /// Returns whether the modal opened.
    pub fn open_from_address(&self, path: &str, query: &str) -> bool {
        match deep_link::requested_fridge(query) {
            Some(fridge) => {
                self.open(fridge, Opener::Url { path: path.to_string(), query: query.to_string() });
                true
            }
            None => false,
        }
    }

    /// Open for a fridge on request of an in-page control
    pub fn open_for(&self, fridge: FridgeId) {
        self.open(fridge, Opener::Event);
    }

    fn open(&self, fridge: FridgeId, opener: Opener) {
        log::debug!("[FORM] open for fridge {} ({:?})", fridge, opener);
        self.update(|state| {
            state.fields = FormFields::for_fridge(fridge);
            state.opener = Some(opener);
        });
    }

    /// Hide the modal. Returns the address to switch to when the modal came
    /// from a deep link, so a page refresh does not open it again.
    pub fn close(&self) -> Option<String> {
        let mut opener = None;
        self.update(|state| opener = state.opener.take());
        match opener {
            Some(Opener::Url { path, query }) => Some(deep_link::address_after_close(&path, &query)),
            _ => None,
        }
    }

    pub fn set_fridge(&self, fridge: FridgeId) {
        self.update(|state| state.fields.fridge = fridge);
    }

    pub fn set_name(&self, name: &str) {
        self.update(|state| state.fields.name = name.to_string());
    }

    /// Mask the typed date and parse it.
    ///
    /// Returns an error notice once a complete-looking date fails to parse.
    pub fn set_date_input(&self, raw: &str) -> Option<Notice> {
        let masked = date::mask_input(raw);
        let parsed = date::to_canonical(&masked);
        let complain = parsed.is_none() && date::is_complete(&masked);
        self.update(|state| {
            state.fields.date_input = masked;
            state.fields.expiration = parsed;
        });
        complain.then(|| Notice::error(MSG_DATE_MALFORMED))
    }

    pub fn set_shelf_input(&self, raw: &str) {
        let shelf = parse_shelf_input(raw);
        self.update(|state| state.fields.shelf = shelf);
    }

    pub fn set_position(&self, position: Position) {
        self.update(|state| state.fields.position = position);
    }

    pub fn set_common_use(&self, common: bool) {
        self.update(|state| state.fields.is_common_use = common);
    }

    pub fn set_added_by(&self, added_by: &str) {
        self.update(|state| state.fields.added_by = added_by.to_string());
    }

    /// Validate and store the item. A submit in flight blocks further ones.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.inner.state.borrow().submitting {
            return SubmitOutcome::Ignored;
        }

        let payload = match validate(&self.inner.state.borrow().fields) {
            Ok(payload) => payload,
            Err(notice) => return SubmitOutcome::Rejected(notice),
        };

        self.update(|state| state.submitting = true);
        let result = self.inner.store.create(&payload).await;
        self.update(|state| state.submitting = false);

        match result {
            Ok(()) => {
                log::info!("[FORM] added '{}' to fridge {}", payload.name, payload.fridge_id);
                let address = self.close();
                self.inner.bus.emit(PageEvent::DataChanged(payload.fridge_id));
                self.inner.bus.emit(PageEvent::RefreshRequested);
                SubmitOutcome::Created { notice: Notice::success(MSG_CREATED), address }
            }
            Err(e) => {
                log::warn!("[FORM] insert failed: {}", e);
                SubmitOutcome::Failed(Notice::error(format!("Ürün eklenirken hata oluştu: {}", e.message())))
            }
        }
    }

    fn update(&self, change: impl FnOnce(&mut FormState)) {
        change(&mut self.inner.state.borrow_mut());
        let snapshot = self.snapshot();
        let hook = self.inner.render.borrow().clone();
        if let Some(hook) = hook {
            hook(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> FormFields {
        FormFields {
            name: "Süt".to_string(),
            date_input: "20/01/2024".to_string(),
            expiration: NaiveDate::from_ymd_opt(2024, 1, 20),
            added_by: "Ayşe".to_string(),
            ..FormFields::for_fridge(FridgeId::Second)
        }
    }

    #[test]
    fn test_valid_fields_build_payload() {
        let payload = validate(&valid_fields()).unwrap();
        assert_eq!(payload.fridge_id, FridgeId::Second);
        assert_eq!(payload.location_shelf, 1);
        assert_eq!(payload.location_position, Position::Left);
    }

    #[test]
    fn test_first_failure_wins() {
        let fields = FormFields { name: " ".to_string(), expiration: None, shelf: 0, ..valid_fields() };
        assert_eq!(validate(&fields).unwrap_err().text, MSG_NAME_REQUIRED);

        let fields = FormFields { expiration: None, shelf: 0, ..valid_fields() };
        assert_eq!(validate(&fields).unwrap_err().text, MSG_DATE_REQUIRED);

        let fields = FormFields { shelf: 0, added_by: String::new(), ..valid_fields() };
        assert_eq!(validate(&fields).unwrap_err().text, MSG_SHELF_INVALID);

        let fields = FormFields { added_by: String::new(), ..valid_fields() };
        assert_eq!(validate(&fields).unwrap_err().text, MSG_ADDED_BY_REQUIRED);
    }

    #[test]
    fn test_shelf_input() {
        assert_eq!(parse_shelf_input(""), 0);
        assert_eq!(parse_shelf_input("3a"), 3);
        assert_eq!(parse_shelf_input("12"), 12);
    }
}

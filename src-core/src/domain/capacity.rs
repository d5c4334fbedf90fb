//! Capacity & Urgency Rules
//!
//! Display-only derivations over the current item set.

use chrono::{Duration, NaiveDate};

use super::item::FridgeItem;

/// How far ahead the expiry panel looks
pub const EXPIRY_WINDOW_DAYS: i64 = 7;

/// `min(100, round(100 * count / capacity))`. Never used to reject inserts.
pub fn fill_percent(count: u32, capacity: u32) -> u8 {
    if capacity == 0 {
        return 0;
    }
    let percent = (100.0 * count as f64 / capacity as f64).round();
    percent.min(100.0) as u8
}

/// Upper bound (inclusive) for the expiring-items query
pub fn expiry_threshold(today: NaiveDate) -> NaiveDate {
    today + Duration::days(EXPIRY_WINDOW_DAYS)
}

/// Past its date as of `today`, compared by calendar day
pub fn is_overdue(item: &FridgeItem, today: NaiveDate) -> bool {
    item.expiration_date < today
}

/// Split an already date-filtered set into `(overdue, upcoming)`.
///
/// Both halves keep the source order.
pub fn partition_by_urgency(items: &[FridgeItem], today: NaiveDate) -> (Vec<FridgeItem>, Vec<FridgeItem>) {
    items.iter().cloned().partition(|item| is_overdue(item, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FridgeId, Position};
    use uuid::Uuid;

    fn make_item(n: u128, date: NaiveDate) -> FridgeItem {
        FridgeItem {
            id: Uuid::from_u128(n),
            fridge_id: FridgeId::First,
            name: format!("Item {}", n),
            expiration_date: date,
            is_common_use: false,
            location_shelf: 1,
            location_position: Position::Left,
            added_by: "test".to_string(),
            created_at: None,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fill_percent() {
        assert_eq!(fill_percent(25, 50), 50);
        assert_eq!(fill_percent(60, 50), 100);
        assert_eq!(fill_percent(0, 50), 0);
        assert_eq!(fill_percent(1, 3), 33);
        assert_eq!(fill_percent(2, 3), 67);
        assert_eq!(fill_percent(5, 0), 0);
    }

    #[test]
    fn test_threshold_is_a_week_ahead() {
        assert_eq!(expiry_threshold(ymd(2024, 1, 10)), ymd(2024, 1, 17));
        assert_eq!(expiry_threshold(ymd(2024, 12, 28)), ymd(2025, 1, 4));
    }

    #[test]
    fn test_partition_today_is_not_overdue() {
        let today = ymd(2024, 1, 10);
        let items = vec![
            make_item(1, ymd(2024, 1, 5)),
            make_item(2, ymd(2024, 1, 10)),
            make_item(3, ymd(2024, 1, 15)),
        ];
        let (overdue, upcoming) = partition_by_urgency(&items, today);
        let dates = |v: &[FridgeItem]| v.iter().map(|i| i.expiration_date).collect::<Vec<_>>();
        assert_eq!(dates(&overdue), vec![ymd(2024, 1, 5)]);
        assert_eq!(dates(&upcoming), vec![ymd(2024, 1, 10), ymd(2024, 1, 15)]);
    }
}

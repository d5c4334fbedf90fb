//! Date Codec
//!
//! Converts between the `dd/mm/yyyy` text users type and the canonical
//! `yyyy-mm-dd` form the store keeps. Parsing is strict: the digits must
//! name a real calendar day on or after 1900-01-01.

use chrono::{Datelike, NaiveDate};

/// Length of a fully typed `dd/mm/yyyy` input
pub const COMPLETE_INPUT_LEN: usize = 10;

const MIN_YEAR: i32 = 1900;

/// Reformat a canonical `yyyy-mm-dd` string as `dd/mm/yyyy`.
///
/// Blank or malformed input yields an empty string.
pub fn to_display(canonical: &str) -> String {
    match split_canonical(canonical) {
        Some((y, m, d)) => format!("{}/{}/{}", d, m, y),
        None => String::new(),
    }
}

/// `dd.mm.yyyy` rendering used by the expiry alert panel; blank shows `-`.
pub fn to_alert_display(canonical: &str) -> String {
    if canonical.trim().is_empty() {
        return "-".to_string();
    }
    match split_canonical(canonical) {
        Some((y, m, d)) => format!("{}.{}.{}", d, m, y),
        None => canonical.to_string(),
    }
}

/// Parse user input (separators optional) into a calendar date.
pub fn to_canonical(display: &str) -> Option<NaiveDate> {
    let digits: String = display.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 8 {
        return None;
    }

    let day: u32 = digits[0..2].parse().ok()?;
    let month: u32 = digits[2..4].parse().ok()?;
    let year: i32 = digits[4..8].parse().ok()?;
    if year < MIN_YEAR {
        return None;
    }

    // from_ymd_opt refuses overflow days (31/04, 29/02 off leap years)
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    if date.day() != day || date.month() != month || date.year() != year {
        return None;
    }
    Some(date)
}

/// Canonical string form of a parsed date
pub fn format_canonical(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Apply the `dd/mm/yyyy` mask to whatever the user typed so far.
///
/// Only digits survive, at most 8 of them. Separators appear once a digit
/// follows the day or the month.
pub fn mask_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).take(8).collect();
    if digits.len() > 4 {
        format!("{}/{}/{}", &digits[0..2], &digits[2..4], &digits[4..])
    } else if digits.len() > 2 {
        format!("{}/{}", &digits[0..2], &digits[2..])
    } else {
        digits
    }
}

/// Whether the masked input looks finished, the point from which an
/// unparseable value is worth complaining about.
pub fn is_complete(masked: &str) -> bool {
    masked.chars().count() == COMPLETE_INPUT_LEN
}

fn split_canonical(canonical: &str) -> Option<(&str, &str, &str)> {
    let mut parts = canonical.split('-');
    let (y, m, d) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || y.is_empty() || m.is_empty() || d.is_empty() {
        return None;
    }
    Some((y, m, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip_for_real_dates() {
        for input in ["01/01/1900", "29/02/2024", "31/12/2099", "15/06/1987"] {
            let date = to_canonical(input).expect(input);
            assert_eq!(to_display(&format_canonical(date)), input);
        }
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert_eq!(to_canonical("31/02/2024"), None);
        assert_eq!(to_canonical("29/02/2023"), None);
        assert_eq!(to_canonical("31/04/2024"), None);
        assert_eq!(to_canonical("00/01/2024"), None);
        assert_eq!(to_canonical("10/13/2024"), None);
    }

    #[test]
    fn test_rejects_years_before_1900() {
        assert_eq!(to_canonical("31/12/1899"), None);
    }

    #[test]
    fn test_requires_exactly_eight_digits() {
        assert_eq!(to_canonical("1/1/2024"), None);
        assert_eq!(to_canonical("01/01/20245"), None);
        assert_eq!(to_canonical(""), None);
        assert_eq!(
            to_canonical("05-01-2024"),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn test_display_degrades_on_malformed() {
        assert_eq!(to_display(""), "");
        assert_eq!(to_display("2024-01"), "");
        assert_eq!(to_display("2024--05"), "");
        assert_eq!(to_display("2024-01-05"), "05/01/2024");
    }

    #[test]
    fn test_alert_display() {
        assert_eq!(to_alert_display("2024-01-05"), "05.01.2024");
        assert_eq!(to_alert_display(""), "-");
    }

    #[test]
    fn test_mask_inserts_separators() {
        assert_eq!(mask_input("1"), "1");
        assert_eq!(mask_input("12"), "12");
        assert_eq!(mask_input("120"), "12/0");
        assert_eq!(mask_input("1203"), "12/03");
        assert_eq!(mask_input("12032"), "12/03/2");
        assert_eq!(mask_input("12/03/2024"), "12/03/2024");
        assert_eq!(mask_input("1203202455"), "12/03/2024");
        assert_eq!(mask_input("ab12"), "12");
    }

    #[test]
    fn test_completeness() {
        assert!(!is_complete("12/03/202"));
        assert!(is_complete("12/03/2024"));
    }
}

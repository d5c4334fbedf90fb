//! Add-Form Deep Links
//!
//! The QR stuck on each fridge opens `/?add=1&fridge=N`, which lands on the
//! main page with the add form open and the fridge pre-selected.

use percent_encoding::percent_decode_str;

use crate::domain::FridgeId;

const ADD_PARAM: &str = "add";
const FRIDGE_PARAM: &str = "fridge";

/// Decoded `key=value` pairs of a query string (leading `?` optional)
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect()
}

fn decode(s: &str) -> String {
    percent_decode_str(&s.replace('+', " ")).decode_utf8_lossy().into_owned()
}

/// If the query asks for the add form, the fridge to pre-select.
///
/// A missing or unknown `fridge` falls back to the first fridge.
pub fn requested_fridge(query: &str) -> Option<FridgeId> {
    let pairs = query_pairs(query);
    let wants_form = pairs.iter().any(|(k, v)| k == ADD_PARAM && v == "1");
    if !wants_form {
        return None;
    }
    let fridge = pairs
        .iter()
        .find(|(k, _)| k == FRIDGE_PARAM)
        .and_then(|(_, v)| FridgeId::parse(v))
        .unwrap_or_default();
    Some(fridge)
}

/// The query string without the deep-link parameters, other pairs untouched.
///
/// Returned without a leading `?`; empty when nothing is left.
pub fn strip_deep_link(query: &str) -> String {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = decode(pair.split_once('=').map_or(*pair, |(k, _)| k));
            key != ADD_PARAM && key != FRIDGE_PARAM
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Path plus query to put in the address bar after stripping
pub fn address_after_close(path: &str, query: &str) -> String {
    let rest = strip_deep_link(query);
    if rest.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, rest)
    }
}

/// Link a fridge's QR code points at
pub fn add_form_link(origin: &str, fridge: FridgeId) -> String {
    format!("{}/?{}=1&{}={}", origin.trim_end_matches('/'), ADD_PARAM, FRIDGE_PARAM, fridge.number())
}

/// Fridge addressed by a `/qr/N` path, if the path is one
pub fn qr_path_fridge(path: &str) -> Option<Option<FridgeId>> {
    let rest = path.trim_end_matches('/').strip_prefix("/qr/")?;
    Some(FridgeId::parse(rest))
}

//! PostgREST Query Strings
//!
//! Builds the `select`/filter/`order` query part of a table request.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but unreserved URL characters gets escaped
const VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

/// Query over one table
#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<(String, Order)>,
}

impl TableQuery {
    pub fn select(columns: &str) -> Self {
        Self { select: Some(columns.to_string()), ..Default::default() }
    }

    /// No `select`, for mutations
    pub fn rows() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn lte(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters.push((column.to_string(), format!("lte.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order = Some((column.to_string(), order));
        self
    }

    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(select) = &self.select {
            parts.push(format!("select={}", encode(select)));
        }
        for (column, value) in &self.filters {
            parts.push(format!("{}={}", column, encode(value)));
        }
        if let Some((column, order)) = &self.order {
            parts.push(format!("order={}.{}", column, order.as_str()));
        }
        parts.join("&")
    }
}

fn encode(value: &str) -> String {
    // `*` is meaningful to PostgREST in select lists
    if value == "*" {
        return value.to_string();
    }
    utf8_percent_encode(value, VALUE).to_string()
}

/// Total row count out of a `Content-Range` header (`0-4/5`, `*/0`)
pub fn parse_content_range_total(header: &str) -> Option<u32> {
    header.rsplit('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fridge_listing_query() {
        let q = TableQuery::select("*").eq("fridge_id", 2).order("created_at", Order::Desc);
        assert_eq!(q.to_query_string(), "select=*&fridge_id=eq.2&order=created_at.desc");
    }

    #[test]
    fn test_expiring_query() {
        let q = TableQuery::select("*")
            .lte("expiration_date", "2024-01-17")
            .order("expiration_date", Order::Asc);
        assert_eq!(
            q.to_query_string(),
            "select=*&expiration_date=lte.2024-01-17&order=expiration_date.asc"
        );
    }

    #[test]
    fn test_values_are_escaped() {
        let q = TableQuery::rows().eq("name", "a&b c");
        assert_eq!(q.to_query_string(), "name=eq.a%26b%20c");
    }

    #[test]
    fn test_content_range_total() {
        assert_eq!(parse_content_range_total("0-4/5"), Some(5));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-4/*"), None);
    }
}

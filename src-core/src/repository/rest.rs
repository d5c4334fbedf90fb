//! PostgREST Item Store
//!
//! `ItemStore` over the hosted store's HTTP API.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use uuid::Uuid;

use super::query::{parse_content_range_total, Order, TableQuery};
use super::traits::{ItemStore, ITEMS_TABLE};
use crate::config::StoreConfig;
use crate::domain::{date, DomainError, DomainResult, FridgeId, FridgeItem, NewFridgeItem};

/// HTTP client for the `fridge_items` table
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    config: StoreConfig,
}

/// Error body PostgREST sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl RestStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { client: Client::new(), config }
    }

    fn table_url(&self, query: &TableQuery) -> String {
        let qs = query.to_query_string();
        if qs.is_empty() {
            format!("{}/{}", self.config.rest_url(), ITEMS_TABLE)
        } else {
            format!("{}/{}?{}", self.config.rest_url(), ITEMS_TABLE, qs)
        }
    }

    async fn send(&self, request: RequestBuilder) -> DomainResult<Response> {
        let response = request
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key)
            .send()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = store_error_message(status.as_u16(), status.canonical_reason(), &body);
        log::warn!("[STORE] request failed with {}: {}", status, message);
        Err(DomainError::Store(message))
    }

    async fn fetch_items(&self, query: TableQuery) -> DomainResult<Vec<FridgeItem>> {
        let response = self.send(self.client.get(self.table_url(&query))).await?;
        response
            .json::<Vec<FridgeItem>>()
            .await
            .map_err(|e| DomainError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl ItemStore for RestStore {
    async fn list_by_fridge(&self, fridge: FridgeId) -> DomainResult<Vec<FridgeItem>> {
        let query = TableQuery::select("*")
            .eq("fridge_id", fridge.number())
            .order("created_at", Order::Desc);
        self.fetch_items(query).await
    }

    async fn list_expiring_by(&self, threshold: NaiveDate) -> DomainResult<Vec<FridgeItem>> {
        let query = TableQuery::select("*")
            .lte("expiration_date", date::format_canonical(threshold))
            .order("expiration_date", Order::Asc);
        self.fetch_items(query).await
    }

    async fn count_by_fridge(&self, fridge: FridgeId) -> DomainResult<u32> {
        let query = TableQuery::select("id").eq("fridge_id", fridge.number());
        let request = self.client.head(self.table_url(&query)).header("Prefer", "count=exact");
        let response = self.send(request).await?;

        let header = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| DomainError::Decode("count response without Content-Range".to_string()))?;
        parse_content_range_total(header)
            .ok_or_else(|| DomainError::Decode(format!("unreadable Content-Range '{}'", header)))
    }

    async fn create(&self, item: &NewFridgeItem) -> DomainResult<()> {
        let request = self
            .client
            .post(self.table_url(&TableQuery::rows()))
            .header("Prefer", "return=minimal")
            .json(&[item]);
        self.send(request).await?;
        log::info!("[STORE] inserted '{}' into fridge {}", item.name, item.fridge_id);
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> DomainResult<()> {
        let query = TableQuery::rows().eq("id", id);
        self.send(self.client.delete(self.table_url(&query))).await?;
        log::info!("[STORE] deleted item {}", id);
        Ok(())
    }
}

/// Message for a failed request: the body's `message` when there is one,
/// else the raw body, else the status line.
pub fn store_error_message(status: u16, reason: Option<&str>, body: &str) -> String {
    if let Ok(ErrorBody { message: Some(message) }) = serde_json::from_str::<ErrorBody>(body) {
        return message;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    match reason {
        Some(reason) => format!("{} {}", status, reason),
        None => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RestStore {
        let config = StoreConfig::from_values(Some("https://abc.supabase.co"), Some("anon")).unwrap();
        RestStore::new(config)
    }

    #[test]
    fn test_table_urls() {
        let store = store();
        assert_eq!(
            store.table_url(&TableQuery::rows()),
            "https://abc.supabase.co/rest/v1/fridge_items"
        );
        let id = Uuid::from_u128(7);
        assert_eq!(
            store.table_url(&TableQuery::rows().eq("id", id)),
            format!("https://abc.supabase.co/rest/v1/fridge_items?id=eq.{}", id)
        );
    }

    #[test]
    fn test_error_message_prefers_body_message() {
        let body = r#"{"code":"42501","message":"permission denied for table fridge_items"}"#;
        assert_eq!(
            store_error_message(403, Some("Forbidden"), body),
            "permission denied for table fridge_items"
        );
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(store_error_message(502, Some("Bad Gateway"), "upstream down"), "upstream down");
        assert_eq!(store_error_message(500, Some("Internal Server Error"), ""), "500 Internal Server Error");
        assert_eq!(store_error_message(599, None, " "), "599");
    }
}

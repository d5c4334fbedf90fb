//! Store Configuration
//!
//! Two values locate the hosted store: its base URL and the public API key.
//! Missing values are a startup failure.

use crate::domain::{DomainError, DomainResult};

pub const URL_VAR: &str = "FRIDGE_STORE_URL";
pub const KEY_VAR: &str = "FRIDGE_STORE_KEY";

/// Endpoint and credential of the hosted store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
}

impl StoreConfig {
    /// Build from raw values, whatever their source
    pub fn from_values(url: Option<&str>, key: Option<&str>) -> DomainResult<Self> {
        let get = |value: Option<&str>, name: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| DomainError::Config(format!("Missing environment variable '{}'", name)))
        };

        let url = get(url, URL_VAR)?.trim_end_matches('/').to_string();
        let key = get(key, KEY_VAR)?;

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DomainError::Config(format!("{} must be an http(s) URL, got '{}'", URL_VAR, url)));
        }

        log::info!("[CONFIG] store endpoint {}", url);
        Ok(Self { url, key })
    }

    /// Base URL of the PostgREST API
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// WebSocket URL of the realtime service
    pub fn realtime_url(&self) -> String {
        let ws_base = if let Some(rest) = self.url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.url.clone()
        };
        format!("{}/realtime/v1/websocket?apikey={}&vsn=1.0.0", ws_base, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_fail() {
        let err = StoreConfig::from_values(None, Some("k")).unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
        assert!(StoreConfig::from_values(Some("https://x.supabase.co"), Some("  ")).is_err());
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(StoreConfig::from_values(Some("x.supabase.co"), Some("k")).is_err());
    }

    #[test]
    fn test_derived_urls() {
        let config = StoreConfig::from_values(Some("https://abc.supabase.co/"), Some("anon")).unwrap();
        assert_eq!(config.rest_url(), "https://abc.supabase.co/rest/v1");
        assert_eq!(
            config.realtime_url(),
            "wss://abc.supabase.co/realtime/v1/websocket?apikey=anon&vsn=1.0.0"
        );
    }
}

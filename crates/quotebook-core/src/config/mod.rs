//! Remote sync configuration.
//!
//! `SyncSettings` is embedded in the CLI config file and controls which
//! remote collection is used, how often it is polled, and how long a single
//! request may take.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::util::{is_http_url, normalize_text_option};

/// Remote collection used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
pub const DEFAULT_USER_ID: u64 = 1;
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    /// Remote collection URL (GET lists, POST creates)
    pub endpoint: String,
    /// Constant `userId` sent with every created item
    pub user_id: u64,
    /// Seconds between scheduled sync cycles
    pub sync_interval_secs: u64,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_id: DEFAULT_USER_ID,
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SyncSettings {
    /// Endpoint trimmed and without trailing slash
    pub fn normalized_endpoint(&self) -> Result<String, String> {
        let endpoint = normalize_text_option(Some(self.endpoint.clone()))
            .ok_or_else(|| "endpoint must not be empty".to_string())?;
        if is_http_url(&endpoint) {
            Ok(endpoint.trim_end_matches('/').to_string())
        } else {
            Err("endpoint must include http:// or https://".to_string())
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.normalized_endpoint()?;
        if self.sync_interval_secs == 0 {
            return Err("sync_interval_secs must be greater than zero".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }

    pub const fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = SyncSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.sync_interval(), Duration::from_secs(5));
    }

    #[test]
    fn normalized_endpoint_trims_trailing_slash() {
        let settings = SyncSettings {
            endpoint: " https://api.example.com/quotes/ ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.normalized_endpoint().as_deref(),
            Ok("https://api.example.com/quotes")
        );
    }

    #[test]
    fn validate_rejects_invalid_values() {
        let no_scheme = SyncSettings {
            endpoint: "api.example.com".to_string(),
            ..Default::default()
        };
        assert!(no_scheme.validate().unwrap_err().contains("http://"));

        let zero_timeout = SyncSettings {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }

    #[test]
    fn parse_fills_missing_fields_with_defaults() {
        let settings: SyncSettings =
            serde_json::from_str(r#"{"endpoint": "http://localhost:3000/posts"}"#).unwrap();
        assert_eq!(settings.endpoint, "http://localhost:3000/posts");
        assert_eq!(settings.user_id, DEFAULT_USER_ID);
        assert_eq!(settings.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn parse_rejects_unknown_fields() {
        let error = serde_json::from_str::<SyncSettings>(r#"{"unexpected": true}"#).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }
}

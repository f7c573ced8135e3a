//! HTTP implementation of the remote gateway.
//!
//! The remote resource is a flat collection of `{id, title, body}` posts.
//! A quote's text travels as `title` and its category as `body`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::gateway::{GatewayError, GatewayResult, RemoteGateway};
use crate::config::SyncSettings;
use crate::models::{Quote, QuoteId};
use crate::util::{compact_text, take_chars};

/// Category given to remote items without a body
pub const DEFAULT_REMOTE_CATEGORY: &str = "General";
/// Remote bodies longer than this are truncated into the category
pub const MAX_REMOTE_CATEGORY_CHARS: usize = 50;

#[derive(Debug, Clone)]
pub struct HttpRemoteGateway {
    endpoint: String,
    user_id: u64,
    client: reqwest::Client,
}

impl HttpRemoteGateway {
    pub fn new(settings: &SyncSettings) -> GatewayResult<Self> {
        settings
            .validate()
            .map_err(GatewayError::InvalidConfiguration)?;
        let endpoint = settings
            .normalized_endpoint()
            .map_err(GatewayError::InvalidConfiguration)?;
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            endpoint,
            user_id: settings.user_id,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RemoteGateway for HttpRemoteGateway {
    async fn fetch_all(&self) -> GatewayResult<Vec<Quote>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status(describe_status(status, &body)));
        }

        let body = response.text().await?;
        parse_remote_posts(&body)
    }

    async fn create(&self, quote: &Quote) -> GatewayResult<String> {
        let payload = CreatePostRequest {
            title: &quote.text,
            body: &quote.category,
            user_id: self.user_id,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status(describe_status(status, &body)));
        }

        let body = response.text().await?;
        parse_created_id(&body)
    }
}

/// Numeric or string identifier, as assigned by the remote
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum RemoteId {
    Number(i64),
    Text(String),
}

impl RemoteId {
    fn into_token(self) -> Option<String> {
        match self {
            Self::Number(id) => Some(id.to_string()),
            Self::Text(id) => {
                let id = id.trim();
                (!id.is_empty()).then(|| id.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RemotePost {
    id: RemoteId,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostRequest<'a> {
    title: &'a str,
    body: &'a str,
    user_id: u64,
}

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    id: RemoteId,
}

/// Parse a remote listing into synced quotes.
///
/// Public for testability. The top level must be an array; individual
/// items that cannot be mapped are skipped.
pub fn parse_remote_posts(payload: &str) -> GatewayResult<Vec<Quote>> {
    let items: Vec<serde_json::Value> = serde_json::from_str(payload)
        .map_err(|error| GatewayError::Decode(format!("expected an array of posts: {error}")))?;

    let mut quotes = Vec::with_capacity(items.len());
    for item in items {
        let post = match serde_json::from_value::<RemotePost>(item) {
            Ok(post) => post,
            Err(error) => {
                tracing::warn!("Skipping malformed remote item: {error}");
                continue;
            }
        };
        match post_to_quote(post) {
            Some(quote) => quotes.push(quote),
            None => tracing::warn!("Skipping remote item without id or title"),
        }
    }
    Ok(quotes)
}

/// Parse the id out of a create response
pub fn parse_created_id(payload: &str) -> GatewayResult<String> {
    let response: CreatePostResponse = serde_json::from_str(payload).map_err(|error| {
        GatewayError::Decode(format!("create response without usable id: {error}"))
    })?;
    response
        .id
        .into_token()
        .ok_or_else(|| GatewayError::Decode("create response returned an empty id".to_string()))
}

fn post_to_quote(post: RemotePost) -> Option<Quote> {
    let remote_id = post.id.into_token()?;
    let text = post.title.filter(|title| !title.trim().is_empty())?;
    let category = post
        .body
        .filter(|body| !body.is_empty())
        .map_or_else(
            || DEFAULT_REMOTE_CATEGORY.to_string(),
            |body| take_chars(&body, MAX_REMOTE_CATEGORY_CHARS),
        );

    Some(Quote::with_id(QuoteId::synced(remote_id), text, category))
}

fn describe_status(status: StatusCode, body: &str) -> String {
    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{trimmed} ({})", status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_remote_posts_maps_fields() {
        let payload = r#"[
            {"userId": 1, "id": 42, "title": "Hello", "body": "Wisdom"},
            {"id": "abc", "title": "No body"}
        ]"#;

        let quotes = parse_remote_posts(payload).unwrap();
        assert_eq!(
            quotes,
            vec![
                Quote::with_id(QuoteId::synced("42"), "Hello", "Wisdom"),
                Quote::with_id(QuoteId::synced("abc"), "No body", "General"),
            ]
        );
    }

    #[test]
    fn parse_remote_posts_truncates_long_bodies() {
        let body = "x".repeat(80);
        let payload = format!(r#"[{{"id": 1, "title": "t", "body": "{body}"}}]"#);

        let quotes = parse_remote_posts(&payload).unwrap();
        assert_eq!(quotes[0].category.chars().count(), MAX_REMOTE_CATEGORY_CHARS);
    }

    #[test]
    fn parse_remote_posts_skips_unusable_items() {
        let payload = r#"[
            {"title": "missing id"},
            {"id": 2, "title": ""},
            {"id": 3, "title": "ok", "body": ""}
        ]"#;

        let quotes = parse_remote_posts(payload).unwrap();
        assert_eq!(
            quotes,
            vec![Quote::with_id(QuoteId::synced("3"), "ok", "General")]
        );
    }

    #[test]
    fn parse_remote_posts_rejects_non_array() {
        assert!(matches!(
            parse_remote_posts(r#"{"id": 1}"#),
            Err(GatewayError::Decode(_))
        ));
        assert!(parse_remote_posts("<html>").is_err());
    }

    #[test]
    fn parse_created_id_accepts_number_and_string() {
        assert_eq!(parse_created_id(r#"{"id": 101, "title": "t"}"#).unwrap(), "101");
        assert_eq!(parse_created_id(r#"{"id": "x9"}"#).unwrap(), "x9");
        assert!(matches!(
            parse_created_id(r#"{"title": "t"}"#),
            Err(GatewayError::Decode(_))
        ));
    }

    #[test]
    fn create_request_uses_remote_field_names() {
        let payload = CreatePostRequest {
            title: "text",
            body: "Life",
            user_id: 1,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"title": "text", "body": "Life", "userId": 1})
        );
    }

    #[test]
    fn new_rejects_invalid_endpoint() {
        let settings = SyncSettings {
            endpoint: "  ".to_string(),
            ..Default::default()
        };
        let error = HttpRemoteGateway::new(&settings).unwrap_err();
        assert!(error.to_string().contains("must not be empty"));
    }

    #[test]
    fn new_normalizes_endpoint() {
        let settings = SyncSettings {
            endpoint: "https://api.example.com/posts/".to_string(),
            ..Default::default()
        };
        let gateway = HttpRemoteGateway::new(&settings).unwrap();
        assert_eq!(gateway.endpoint(), "https://api.example.com/posts");
    }
}

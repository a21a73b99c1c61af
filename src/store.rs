//! Remote store access.
//!
//! The pipeline consumes the hosted database through two opaque, paginated
//! capabilities expressed by [`RemoteStore`]: querying a collection and
//! listing the content blocks of a page. [`NotionClient`] implements them
//! over the Notion REST API; tests substitute an in-memory store.

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::model::{Block, Page, Paginated};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Paginated read access to the hosted database.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch one page of rows from a collection.
    async fn query(
        &self,
        collection_id: &str,
        cursor: Option<&str>,
    ) -> Result<Paginated<Page>, SyncError>;

    /// Fetch one page of content blocks from a page body.
    async fn list_blocks(
        &self,
        page_id: &str,
        cursor: Option<&str>,
    ) -> Result<Paginated<Block>, SyncError>;
}

/// [`RemoteStore`] over the Notion REST API.
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl NotionClient {
    /// Build a client carrying the credential and API version headers.
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.store_credential))
            .map_err(|_| {
                SyncError::InvalidConfig("store credential contains invalid characters".into())
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(&config.api_version).map_err(|_| {
                SyncError::InvalidConfig(format!("invalid API version '{}'", config.api_version))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("notion2site/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }
}

#[async_trait]
impl RemoteStore for NotionClient {
    async fn query(
        &self,
        collection_id: &str,
        cursor: Option<&str>,
    ) -> Result<Paginated<Page>, SyncError> {
        let endpoint = format!("{}/databases/{}/query", self.base_url, collection_id);
        let mut body = serde_json::json!({ "page_size": self.page_size });
        if let Some(c) = cursor {
            body["start_cursor"] = serde_json::Value::String(c.to_string());
        }
        debug!("POST {} (cursor: {:?})", endpoint, cursor);

        let response = self.client.post(&endpoint).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SyncError::QueryFailed {
                collection: collection_id.to_string(),
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }
        decode(&endpoint, &text)
    }

    async fn list_blocks(
        &self,
        page_id: &str,
        cursor: Option<&str>,
    ) -> Result<Paginated<Block>, SyncError> {
        let endpoint = format!("{}/blocks/{}/children", self.base_url, page_id);
        let mut params = vec![("page_size", self.page_size.to_string())];
        if let Some(c) = cursor {
            params.push(("start_cursor", c.to_string()));
        }
        debug!("GET {} (cursor: {:?})", endpoint, cursor);

        let response = self.client.get(&endpoint).query(&params).send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SyncError::BlocksFailed {
                page_id: page_id.to_string(),
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }
        decode(&endpoint, &text)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, SyncError> {
    serde_json::from_str(body).map_err(|e| SyncError::Decode {
        endpoint: endpoint.to_string(),
        detail: e.to_string(),
    })
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Pull `code: message` out of a Notion error body, or fall back to the raw text.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(err) if !err.message.is_empty() => {
            if err.code.is_empty() {
                err.message
            } else {
                format!("{}: {}", err.code, err.message)
            }
        }
        _ => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`RemoteStore`] for unit tests.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves pre-split pages. Cursors are the stringified index of the next page.
    #[derive(Default)]
    pub struct MemoryStore {
        pub collections: HashMap<String, Vec<Vec<Page>>>,
        pub bodies: HashMap<String, Vec<Vec<Block>>>,
        pub failing: Vec<String>,
        pub calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl MemoryStore {
        pub fn with_collection(mut self, id: &str, pages: Vec<Vec<Page>>) -> Self {
            self.collections.insert(id.to_string(), pages);
            self
        }

        pub fn with_body(mut self, page_id: &str, blocks: Vec<Block>) -> Self {
            self.bodies.insert(page_id.to_string(), vec![blocks]);
            self
        }

        pub fn failing_on(mut self, id: &str) -> Self {
            self.failing.push(id.to_string());
            self
        }

        fn serve<T: Clone>(
            chunks: Option<&Vec<Vec<T>>>,
            cursor: Option<&str>,
        ) -> Paginated<T> {
            let Some(chunks) = chunks else {
                return Paginated {
                    results: Vec::new(),
                    has_more: false,
                    next_cursor: None,
                };
            };
            let idx: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
            let has_more = idx + 1 < chunks.len();
            Paginated {
                results: chunks.get(idx).cloned().unwrap_or_default(),
                has_more,
                next_cursor: has_more.then(|| (idx + 1).to_string()),
            }
        }
    }

    #[async_trait]
    impl RemoteStore for MemoryStore {
        async fn query(
            &self,
            collection_id: &str,
            cursor: Option<&str>,
        ) -> Result<Paginated<Page>, SyncError> {
            self.calls
                .lock()
                .unwrap()
                .push((collection_id.to_string(), cursor.map(String::from)));
            if self.failing.iter().any(|f| f == collection_id) {
                return Err(SyncError::QueryFailed {
                    collection: collection_id.to_string(),
                    status: 500,
                    detail: "internal_server_error".into(),
                });
            }
            Ok(Self::serve(self.collections.get(collection_id), cursor))
        }

        async fn list_blocks(
            &self,
            page_id: &str,
            cursor: Option<&str>,
        ) -> Result<Paginated<Block>, SyncError> {
            Ok(Self::serve(self.bodies.get(page_id), cursor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_detail_prefers_api_message() {
        let body = r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#;
        assert_eq!(error_detail(body), "unauthorized: API token is invalid.");
    }

    #[test]
    fn error_detail_falls_back_to_raw_body() {
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn client_rejects_credential_with_newline() {
        let mut config = crate::config::SyncConfig::default();
        config.store_credential = "secret\nvalue".into();
        assert!(matches!(
            NotionClient::new(&config),
            Err(SyncError::InvalidConfig(_))
        ));
    }
}

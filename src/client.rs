use crate::models::{Content, Envelope, PaginationMeta};
use crate::query::Query;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Fallback banner text when the server does not supply a message.
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch contents";

/// Failure of a single catalog round trip. Both kinds are recoverable and
/// collapse to one user-facing banner message.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network, DNS or connection failure: no usable server response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered but refused: non-2xx status or a non-success
    /// envelope. Carries the best message available at construction time.
    #[error("{message}")]
    Application { message: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl FetchError {
    /// Best-effort banner text. Transport failures have no server message,
    /// so they fall back to the generic one.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => GENERIC_FETCH_ERROR.to_string(),
            Self::Application { message } => message.clone(),
        }
    }
}

/// One page of catalog results. `meta` is absent when the server omits the
/// pagination block.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    pub items: Vec<Content>,
    pub meta: Option<PaginationMeta>,
}

/// Read access to the remote catalog. `CatalogClient` is the production
/// implementation; tests substitute stubs.
#[async_trait]
pub trait ContentGateway {
    async fn list_contents(&self, query: &Query) -> Result<CatalogPage, FetchError>;
    async fn get_content(&self, id: &str) -> Result<Content, FetchError>;
}

/// HTTP client for the catalog API. Explicitly constructed with its base
/// URL and passed in wherever fetching happens.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("catview/0.1")
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ContentGateway for CatalogClient {
    async fn list_contents(&self, query: &Query) -> Result<CatalogPage, FetchError> {
        let url = format!("{}/api/v1/contents", self.base_url);
        let params = query.to_params();
        tracing::debug!(%url, params = params.len(), "fetching contents");

        let response = self.http.get(&url).query(&params).send().await?;
        let (items, meta) = read_envelope::<Vec<Content>>(response).await?;

        tracing::debug!(count = items.len(), has_meta = meta.is_some(), "contents fetched");
        Ok(CatalogPage { items, meta })
    }

    async fn get_content(&self, id: &str) -> Result<Content, FetchError> {
        let url = format!("{}/api/v1/contents/{}", self.base_url, id);
        tracing::debug!(%url, "fetching content by id");

        let response = self.http.get(&url).send().await?;
        let (content, _) = read_envelope::<Content>(response).await?;
        Ok(content)
    }
}

/// Unwraps the server envelope into typed data plus optional pagination
/// meta, turning non-2xx statuses and non-success envelopes into
/// application failures with the best available message.
async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<(T, Option<PaginationMeta>), FetchError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(FetchError::Application {
            message: extract_message(&body),
        });
    }

    let envelope: Envelope<serde_json::Value> =
        serde_json::from_str(&body).map_err(|_| FetchError::Application {
            message: extract_message(&body),
        })?;

    if !envelope.success {
        return Err(FetchError::Application {
            message: or_generic(envelope.message),
        });
    }

    let data: T = serde_json::from_value(envelope.data).map_err(|_| FetchError::Application {
        message: GENERIC_FETCH_ERROR.to_string(),
    })?;

    Ok((data, envelope.meta))
}

/// Pulls a `message` field out of an arbitrary error body, if any.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_FETCH_ERROR.to_string())
}

fn or_generic(message: String) -> String {
    if message.is_empty() {
        GENERIC_FETCH_ERROR.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;

    #[test]
    fn extract_message_prefers_the_server_field() {
        assert_eq!(
            extract_message(r#"{"success":false,"message":"rate limited"}"#),
            "rate limited"
        );
        assert_eq!(extract_message(r#"{"message":""}"#), GENERIC_FETCH_ERROR);
        assert_eq!(extract_message("<html>502</html>"), GENERIC_FETCH_ERROR);
        assert_eq!(extract_message(""), GENERIC_FETCH_ERROR);
    }

    #[test]
    fn transport_errors_collapse_to_the_generic_banner() {
        let err = FetchError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), GENERIC_FETCH_ERROR);

        let err = FetchError::Application {
            message: "catalog unavailable".to_string(),
        };
        assert_eq!(err.user_message(), "catalog unavailable");
    }

    #[test]
    fn list_envelope_decodes_items_and_meta() {
        let body = r#"{
            "success": true,
            "message": "ok",
            "data": [{
                "id": "c1",
                "external_id": "yt-1",
                "title": "Borrow checker deep dive",
                "type": "video",
                "provider": "youtube",
                "score": 91.4,
                "metrics": {
                    "views": 15200,
                    "likes": 640,
                    "duration": "185",
                    "reading_time": null,
                    "reactions": null,
                    "comments": "12"
                },
                "categories": ["rust", "compilers"],
                "published_at": "2024-03-10T12:00:00Z"
            }],
            "meta": {
                "total": 41,
                "limit": 5,
                "offset": 0,
                "has_more": true,
                "current_page": 1,
                "total_pages": 9
            }
        }"#;

        let envelope: Envelope<Vec<Content>> = serde_json::from_str(body).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.len(), 1);

        let content = &envelope.data[0];
        assert_eq!(content.content_type, ContentType::Video);
        assert_eq!(content.metrics.duration.as_deref(), Some("185"));
        assert!(content.metrics.reading_time.is_none());
        assert_eq!(content.categories, vec!["rust", "compilers"]);

        let meta = envelope.meta.unwrap();
        assert_eq!(meta.total_pages, 9);
        assert!(meta.has_more);
    }

    #[test]
    fn envelope_without_meta_leaves_it_absent() {
        let body = r#"{"success": true, "message": "", "data": []}"#;
        let envelope: Envelope<Vec<Content>> = serde_json::from_str(body).unwrap();
        assert!(envelope.data.is_empty());
        assert!(envelope.meta.is_none());
    }
}

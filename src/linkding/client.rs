//! HTTP client for the Linkding REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{ApiError, ApiResult};
use super::types::{Bookmark, BookmarkPage, BookmarkRequest, TagPage};

/// Upper bound on every Linkding call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const BOOKMARKS_PATH: &str = "/api/bookmarks/";
const TAGS_PATH: &str = "/api/tags/";

/// The Linkding operations the MCP layer depends on.
///
/// [`LinkdingClient`] is the production implementation; tests substitute
/// their own to observe calls without a network.
#[async_trait]
pub trait LinkdingApi: Send + Sync {
    /// Lists bookmarks, optionally filtered by a Linkding search query.
    ///
    /// `limit` and `offset` are only sent when positive, `query` only when
    /// non-empty.
    async fn list_bookmarks(&self, limit: i64, offset: i64, query: &str)
        -> ApiResult<BookmarkPage>;

    /// Creates a bookmark. Expects `201 Created`.
    async fn create_bookmark(&self, request: &BookmarkRequest) -> ApiResult<Bookmark>;

    /// Replaces the fields of bookmark `id`. Expects `200 OK`.
    async fn update_bookmark(&self, id: i64, request: &BookmarkRequest) -> ApiResult<Bookmark>;

    /// Deletes bookmark `id`. Expects `204 No Content`.
    async fn delete_bookmark(&self, id: i64) -> ApiResult<()>;

    /// Archives bookmark `id`. Expects `204 No Content`.
    async fn archive_bookmark(&self, id: i64) -> ApiResult<()>;

    /// Unarchives bookmark `id`. Expects `204 No Content`.
    async fn unarchive_bookmark(&self, id: i64) -> ApiResult<()>;

    /// Lists tags. Same parameter policy as [`LinkdingApi::list_bookmarks`].
    async fn list_tags(&self, limit: i64, offset: i64) -> ApiResult<TagPage>;
}

/// Linkding API client backed by a shared reqwest connection pool.
///
/// Configuration is fixed at construction, so one instance can serve
/// concurrent calls without locking.
#[derive(Debug, Clone)]
pub struct LinkdingClient {
    base_url: Url,
    http: reqwest::Client,
    timeout: Duration,
}

impl LinkdingClient {
    /// Creates a client for the Linkding instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute `http`/`https` URL, the
    /// token cannot be sent as a header, or the HTTP client cannot be built.
    pub fn new(base_url: &str, api_token: &str) -> ApiResult<Self> {
        Self::with_timeout(base_url, api_token, REQUEST_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Same as [`LinkdingClient::new`].
    pub fn with_timeout(base_url: &str, api_token: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = parse_base_url(base_url)?;

        let mut auth = HeaderValue::from_str(&format!("Token {api_token}"))
            .map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| ApiError::Transport { source })?;

        Ok(Self {
            base_url,
            http,
            timeout,
        })
    }

    /// Returns the Linkding base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Builds the absolute URL for `path` below the base URL.
    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{base_path}{path}"));
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }

    /// Sends a request and checks the response status.
    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        expected: StatusCode,
    ) -> ApiResult<reqwest::Response> {
        tracing::debug!(method = %method, url = %url, "Linkding request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if status != expected {
            tracing::debug!(status = status.as_u16(), "Linkding request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Reads and decodes a JSON response body.
    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> ApiResult<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { source })
    }

    fn transport_error(&self, source: reqwest::Error) -> ApiError {
        if source.is_timeout() {
            ApiError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            ApiError::Transport { source }
        }
    }

    async fn post_action(&self, id: i64, action: &str) -> ApiResult<()> {
        let url = self.endpoint(&format!("{BOOKMARKS_PATH}{id}/{action}/"), &[]);
        self.send::<()>(Method::POST, url, None, StatusCode::NO_CONTENT)
            .await
            .map(drop)
    }
}

#[async_trait]
impl LinkdingApi for LinkdingClient {
    async fn list_bookmarks(
        &self,
        limit: i64,
        offset: i64,
        query: &str,
    ) -> ApiResult<BookmarkPage> {
        let mut params = page_params(limit, offset);
        if !query.is_empty() {
            params.push(("q", query.to_string()));
        }

        let url = self.endpoint(BOOKMARKS_PATH, &params);
        let response = self
            .send::<()>(Method::GET, url, None, StatusCode::OK)
            .await?;
        self.decode(response).await
    }

    async fn create_bookmark(&self, request: &BookmarkRequest) -> ApiResult<Bookmark> {
        let url = self.endpoint(BOOKMARKS_PATH, &[]);
        let response = self
            .send(Method::POST, url, Some(request), StatusCode::CREATED)
            .await?;
        self.decode(response).await
    }

    async fn update_bookmark(&self, id: i64, request: &BookmarkRequest) -> ApiResult<Bookmark> {
        let url = self.endpoint(&format!("{BOOKMARKS_PATH}{id}/"), &[]);
        let response = self
            .send(Method::PUT, url, Some(request), StatusCode::OK)
            .await?;
        self.decode(response).await
    }

    async fn delete_bookmark(&self, id: i64) -> ApiResult<()> {
        let url = self.endpoint(&format!("{BOOKMARKS_PATH}{id}/"), &[]);
        self.send::<()>(Method::DELETE, url, None, StatusCode::NO_CONTENT)
            .await
            .map(drop)
    }

    async fn archive_bookmark(&self, id: i64) -> ApiResult<()> {
        self.post_action(id, "archive").await
    }

    async fn unarchive_bookmark(&self, id: i64) -> ApiResult<()> {
        self.post_action(id, "unarchive").await
    }

    async fn list_tags(&self, limit: i64, offset: i64) -> ApiResult<TagPage> {
        let url = self.endpoint(TAGS_PATH, &page_params(limit, offset));
        let response = self
            .send::<()>(Method::GET, url, None, StatusCode::OK)
            .await?;
        self.decode(response).await
    }
}

/// Pagination parameters, each present only when positive.
fn page_params(limit: i64, offset: i64) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(3);
    if limit > 0 {
        params.push(("limit", limit.to_string()));
    }
    if offset > 0 {
        params.push(("offset", offset.to_string()));
    }
    params
}

/// Validates the configured base URL.
///
/// # Errors
///
/// Returns [`ApiError::InvalidBaseUrl`] unless `raw` is an absolute
/// `http`/`https` URL.
pub fn parse_base_url(raw: &str) -> ApiResult<Url> {
    let invalid = |reason: &str| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("URL has no host"));
    }

    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

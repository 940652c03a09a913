//! HTTP client for the watch log server.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use watchlog_core::{EntryDraft, EntryId, WatchLogEntry};

/// Header carrying the shared password.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Client errors, classified from the HTTP status or the transport failure.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Wrong password")]
    Auth,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("Network error: cannot reach the server, check your connection")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a non-success response by status, preferring the `{error}`
    /// message from the body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            tracing::debug!(error = %err, "request failed");
            Self::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: EntryId,
}

/// Authenticated access to the `/api` routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let resp = request
            .header(ACCESS_TOKEN_HEADER, &self.token)
            .send()
            .await?;

        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        tracing::debug!(%status, body = %body, "server rejected request");
        Err(ClientError::from_response(status, &body))
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = self.send(request).await?;
        resp.json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Check the server is up. Does not need a valid password.
    pub async fn health(&self) -> Result<bool> {
        let resp = self.client.get(self.url("/health")).send().await?;
        Ok(resp.status().is_success())
    }

    pub async fn list(&self) -> Result<Vec<WatchLogEntry>> {
        self.json(self.client.get(self.url("/api/logs"))).await
    }

    pub async fn search(&self, term: &str) -> Result<Vec<WatchLogEntry>> {
        let request = self
            .client
            .get(self.url("/api/search"))
            .query(&[("q", term)]);
        self.json(request).await
    }

    /// All entries, or only title matches when a non-blank term is given.
    pub async fn fetch(&self, term: Option<&str>) -> Result<Vec<WatchLogEntry>> {
        match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(term) => self.search(term).await,
            None => self.list().await,
        }
    }

    pub async fn get(&self, id: EntryId) -> Result<WatchLogEntry> {
        self.json(self.client.get(self.url(&format!("/api/logs/{}", id))))
            .await
    }

    pub async fn create(&self, draft: &EntryDraft) -> Result<EntryId> {
        let created: CreatedResponse = self
            .json(self.client.post(self.url("/api/logs")).json(draft))
            .await?;
        Ok(created.id)
    }

    pub async fn update(&self, id: EntryId, draft: &EntryDraft) -> Result<()> {
        let request = self
            .client
            .put(self.url(&format!("/api/logs/{}", id)))
            .json(draft);
        self.send(request).await?;
        Ok(())
    }

    pub async fn delete(&self, id: EntryId) -> Result<()> {
        self.send(self.client.delete(self.url(&format!("/api/logs/{}", id))))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_forbidden_is_auth_failure() {
        let err = ClientError::from_response(
            StatusCode::FORBIDDEN,
            r#"{"error":"Unauthorized: wrong password"}"#,
        );
        assert!(matches!(err, ClientError::Auth));
        assert_eq!(err.to_string(), "Wrong password");
    }

    #[test]
    fn test_bad_request_keeps_server_message() {
        let err = ClientError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Invalid entry: title is required"}"#,
        );
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid entry: title is required");
    }

    #[test]
    fn test_not_found() {
        let err = ClientError::from_response(
            StatusCode::NOT_FOUND,
            r#"{"error":"Not found: log 42"}"#,
        );
        assert!(matches!(err, ClientError::NotFound(ref m) if m == "Not found: log 42"));
    }

    #[test]
    fn test_plain_text_body_is_used_verbatim() {
        let err = ClientError::from_response(StatusCode::BAD_GATEWAY, "upstream down\n");
        match err {
            ClientError::Server { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[test]
    fn test_internal_error_is_server_failure() {
        let err = ClientError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"Database error: pool timed out"}"#,
        );
        assert_eq!(
            err.to_string(),
            "Server error: 500 - Database error: pool timed out"
        );
    }

    #[test]
    fn test_network_message() {
        let err = ClientError::Network("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "Network error: cannot reach the server, check your connection"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:3001/", "secret");
        assert_eq!(client.base_url(), "http://localhost:3001");
        assert_eq!(client.url("/api/logs"), "http://localhost:3001/api/logs");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Nothing listens on the discard port
        let client = ApiClient::new("http://127.0.0.1:9", "secret");
        let err = client.list().await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}

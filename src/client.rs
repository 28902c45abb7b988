//! Zaptec HTTP client.
//!
//! Low-level client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on record types and
//! composed by [`ZaptecClient`](crate::ZaptecClient).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::auth::{extract_error_message, Credentials, TokenManager, TokenState};
use crate::error::{Result, ZaptecError};

pub const DEFAULT_API_URL: &str = "https://api.zaptec.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("zaptecapi/", env!("CARGO_PKG_VERSION"));

/// Everything a client needs at construction.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g. `https://api.zaptec.com`).
    pub base_url: String,
    /// Upper bound for each individual HTTP call.
    pub timeout: Duration,
    /// Account credentials and installation.
    pub credentials: Credentials,
    /// Skip TLS certificate verification.
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    /// Config for the production API with the default timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            credentials,
            accept_invalid_certs: false,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A successful response body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// A 2xx response that is not JSON is a contract change and is reported
    /// as [`ZaptecError::SchemaValidation`].
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| ZaptecError::SchemaValidation {
            schema: "json",
            missing_fields: Vec::new(),
            unexpected_types: vec![format!("body is not valid JSON: {e}")],
        })
    }
}

/// Authenticated HTTP session against the Zaptec API.
///
/// Owns the connection pool and the current access token for its whole
/// lifetime. The pool is released when the client is dropped, whichever
/// path the owning scope exits through.
pub struct HttpClient {
    http: Client,
    base_url: Arc<Url>,
    credentials: Credentials,
    tokens: TokenManager,
    token: Mutex<Option<TokenState>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.credentials.username())
            .finish_non_exhaustive()
    }
}

impl Drop for HttpClient {
    fn drop(&mut self) {
        tracing::debug!(base_url = %self.base_url, "closing Zaptec session");
    }
}

impl HttpClient {
    /// Open a session.
    ///
    /// No network traffic happens until the first request; the token is
    /// obtained lazily.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if config.base_url.ends_with('/') {
            config.base_url.clone()
        } else {
            format!("{}/", config.base_url)
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(ZaptecError::Transport)?;

        let tokens = TokenManager::new(http.clone(), &base_url)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            credentials: config.credentials,
            tokens,
            token: Mutex::new(None),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Number of credential exchanges this session has performed.
    pub fn authentications(&self) -> u32 {
        self.tokens.authentications()
    }

    /// End the session explicitly, releasing the connection pool.
    pub fn close(self) {
        drop(self);
    }

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<RawResponse> {
        self.request::<(), ()>(Method::GET, path, None, None).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_query<Q>(&self, path: &str, query: &Q) -> Result<RawResponse>
    where
        Q: Serialize + ?Sized + Sync,
    {
        self.request::<Q, ()>(Method::GET, path, Some(query), None).await
    }

    /// Make a POST request with JSON body.
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<RawResponse>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.request::<(), B>(Method::POST, path, None, Some(body)).await
    }

    /// Issue an authenticated request.
    ///
    /// A valid token is ensured before the call. A 401 answer triggers one
    /// forced token refresh and one retry; a second 401 is returned as
    /// [`ZaptecError::Authentication`]. Every other non-success status is
    /// returned as [`ZaptecError::Http`] without retrying.
    ///
    /// # Errors
    ///
    /// See above; transport timeouts surface as [`ZaptecError::Timeout`].
    #[tracing::instrument(skip(self, query, body))]
    pub async fn request<Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<RawResponse>
    where
        Q: Serialize + ?Sized + Sync,
        B: Serialize + ?Sized + Sync,
    {
        let url = self.base_url.join(path.trim_start_matches('/'))?;

        let token = self.access_token(false).await?;
        let response = self.send(method.clone(), url.clone(), &token, query, body).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check_response(response).await;
        }

        tracing::info!("request unauthorized, refreshing token and retrying once");
        let token = self.access_token(true).await?;
        let response = self.send(method, url, &token, query, body).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let status = response.status();
            let body = response.text().await.map_err(ZaptecError::from_transport)?;
            return Err(ZaptecError::Authentication {
                status: status.as_u16(),
                message: extract_error_message(&body, status),
            });
        }

        Self::check_response(response).await
    }

    /// Current token, refreshed if needed. `force` discards the held token.
    async fn access_token(&self, force: bool) -> Result<String> {
        let mut slot = self.token.lock().await;
        let current = if force { None } else { slot.take() };

        let state = self
            .tokens
            .ensure_valid(current, &self.credentials, Utc::now())
            .await?;
        let token = state.access_token().to_string();
        *slot = Some(state);

        Ok(token)
    }

    async fn send<Q, B>(
        &self,
        method: Method,
        url: Url,
        token: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<Response>
    where
        Q: Serialize + ?Sized + Sync,
        B: Serialize + ?Sized + Sync,
    {
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(ZaptecError::from_transport)
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<RawResponse> {
        let status = response.status();
        let body = response.text().await.map_err(ZaptecError::from_transport)?;

        tracing::debug!(status = status.as_u16(), len = body.len(), "response received");

        if status.is_success() {
            return Ok(RawResponse {
                status: status.as_u16(),
                body,
            });
        }

        Err(ZaptecError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ClientConfig {
        let creds = Credentials::new("user", "secret-password", "inst-1").unwrap();
        ClientConfig::new(creds).with_base_url(base_url)
    }

    #[test]
    fn test_client_debug() {
        let client = HttpClient::new(config("https://api.zaptec.com")).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("HttpClient"));
        assert!(debug.contains("base_url"));
        // Password should not be in debug output
        assert!(!debug.contains("secret-password"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = HttpClient::new(config("https://api.zaptec.com")).unwrap();
        let client2 = HttpClient::new(config("https://api.zaptec.com/")).unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpClient::new(config("not a url"));
        assert!(matches!(result, Err(ZaptecError::Url(_))));
    }

    #[test]
    fn test_config_defaults() {
        let creds = Credentials::new("user", "pass", "inst").unwrap();
        let config = ClientConfig::new(creds).with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_raw_response_non_json_is_contract_change() {
        let raw = RawResponse {
            status: 200,
            body: "<html>maintenance</html>".to_string(),
        };
        assert!(raw.json().unwrap_err().is_contract_change());
    }
}

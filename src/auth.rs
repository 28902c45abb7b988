//! Credential exchange and access-token lifecycle.
//!
//! The Zaptec API uses the OAuth password grant: credentials are traded for
//! a short-lived bearer token. [`TokenManager::ensure_valid`] is the single
//! path by which outbound requests obtain a usable token.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{Result, ZaptecError};

/// Seconds subtracted from a token's reported lifetime so a token is never
/// used when it could expire mid-request.
pub const SAFETY_BUFFER_SECS: i64 = 120;

const TOKEN_PATH: &str = "oauth/token";

/// Zaptec account credentials plus the installation they report on.
///
/// All three values must be non-empty; this is checked once at
/// construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
    installation_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("installation_id", &self.installation_id)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Create a credential set.
    ///
    /// # Errors
    ///
    /// Returns [`ZaptecError::ConfigMissing`] if any value is empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        installation_id: impl Into<String>,
    ) -> Result<Self> {
        let username = non_empty("username", username.into())?;
        let password = non_empty("password", password.into())?;
        let installation_id = non_empty("installation id", installation_id.into())?;

        Ok(Self {
            username,
            password,
            installation_id,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn installation_id(&self) -> &str {
        &self.installation_id
    }
}

fn non_empty(what: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ZaptecError::ConfigMissing(format!("{what} must not be empty")));
    }
    Ok(value)
}

/// An access token and the window in which it may be used.
///
/// Token states are replaced wholesale on refresh, never patched.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
    access_token: String,
    issued_at: DateTime<Utc>,
    expires_in: u64,
}

impl std::fmt::Debug for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenState")
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

impl TokenState {
    /// Create a token state issued at `issued_at` and valid for `expires_in` seconds.
    pub fn new(access_token: impl Into<String>, issued_at: DateTime<Utc>, expires_in: u64) -> Self {
        Self {
            access_token: access_token.into(),
            issued_at,
            expires_in,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// The last instant (exclusive) at which the token is considered usable.
    ///
    /// `None` means the lifetime is too large to represent, i.e. the token
    /// never needs refreshing in practice.
    pub fn usable_until(&self) -> Option<DateTime<Utc>> {
        let lifetime = i64::try_from(self.expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)?;
        self.issued_at
            .checked_add_signed(lifetime)?
            .checked_sub_signed(TimeDelta::seconds(SAFETY_BUFFER_SECS))
    }

    /// True iff `now < issued_at + expires_in - SAFETY_BUFFER_SECS`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.usable_until().map_or(true, |until| now < until)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Performs the token exchange and decides when a token must be replaced.
#[derive(Debug)]
pub struct TokenManager {
    http: Client,
    token_url: Url,
    authentications: AtomicU32,
}

impl TokenManager {
    /// Create a token manager exchanging credentials at `{base_url}/oauth/token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token URL cannot be derived from `base_url`.
    pub fn new(http: Client, base_url: &Url) -> Result<Self> {
        Ok(Self {
            http,
            token_url: base_url.join(TOKEN_PATH)?,
            authentications: AtomicU32::new(0),
        })
    }

    /// Number of credential exchanges performed so far.
    pub fn authentications(&self) -> u32 {
        self.authentications.load(Ordering::Relaxed)
    }

    /// Exchange credentials for a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`ZaptecError::Authentication`] on any non-success status or
    /// a response without a token, [`ZaptecError::Timeout`] if the exchange
    /// exceeds the configured timeout.
    #[tracing::instrument(skip_all, fields(username = %credentials.username()))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<TokenState> {
        let form = [
            ("grant_type", "password"),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];

        self.authentications.fetch_add(1, Ordering::Relaxed);
        let issued_at = Utc::now();

        let response = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(ZaptecError::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ZaptecError::from_transport)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "token exchange rejected");
            return Err(ZaptecError::Authentication {
                status: status.as_u16(),
                message: extract_error_message(&body, status),
            });
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ZaptecError::Authentication {
                status: status.as_u16(),
                message: format!("unusable token response: {e}"),
            })?;

        tracing::info!(expires_in = token.expires_in, "obtained access token");

        Ok(TokenState::new(token.access_token, issued_at, token.expires_in))
    }

    /// Return `state` unchanged while it is valid at `now`, otherwise
    /// authenticate and return the replacement.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`TokenManager::authenticate`].
    pub async fn ensure_valid(
        &self,
        state: Option<TokenState>,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<TokenState> {
        match state {
            Some(state) if state.is_valid(now) => Ok(state),
            Some(_) => {
                tracing::debug!("access token inside safety buffer, refreshing");
                self.authenticate(credentials).await
            }
            None => self.authenticate(credentials).await,
        }
    }
}

/// Extract a human-readable message from an error body.
pub(crate) fn extract_error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "message", "Message", "error"] {
            if let Some(msg) = json.get(key).and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }
    }

    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

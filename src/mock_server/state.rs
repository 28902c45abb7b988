//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Zaptec API server.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Charger, ChargingSession, Installation, InstallationReport};

pub const DEFAULT_USERNAME: &str = "test-user";
pub const DEFAULT_PASSWORD: &str = "test-password";
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access; tests can inspect
/// and modify it while the server runs.
#[derive(Debug)]
pub struct MockState {
    /// Accepted username.
    pub username: String,
    /// Accepted password.
    pub password: String,
    /// Lifetime reported for issued tokens, in seconds.
    pub expires_in: u64,
    /// Number of tokens issued so far.
    pub tokens_issued: u32,
    /// The only token currently accepted.
    pub active_token: Option<String>,
    /// Answer this many upcoming API requests with 401.
    pub unauthorized_responses: u32,
    /// Items per page on list endpoints.
    pub page_size: usize,
    /// Charge history, in server order.
    pub sessions: Vec<ChargingSession>,
    pub chargers: Vec<Charger>,
    pub installations: Vec<Installation>,
    /// Report returned by the installation report endpoint.
    pub report: Option<InstallationReport>,
    /// Body of the last installation report request.
    pub last_report_request: Option<serde_json::Value>,
    /// Number of list page requests served.
    pub page_requests: u32,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            expires_in: 3600,
            tokens_issued: 0,
            active_token: None,
            unauthorized_responses: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sessions: Vec::new(),
            chargers: Vec::new(),
            installations: Vec::new(),
            report: None,
            last_report_request: None,
            page_requests: 0,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Set the lifetime of issued tokens.
    pub fn with_expires_in(mut self, expires_in: u64) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Set the list page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_sessions(mut self, sessions: Vec<ChargingSession>) -> Self {
        self.sessions.extend(sessions);
        self
    }

    pub fn with_charger(mut self, charger: Charger) -> Self {
        self.chargers.push(charger);
        self
    }

    pub fn with_installation(mut self, installation: Installation) -> Self {
        self.installations.push(installation);
        self
    }

    pub fn with_report(mut self, report: InstallationReport) -> Self {
        self.report = Some(report);
        self
    }

    /// Answer the next `count` API requests with 401.
    pub fn reject_next(&mut self, count: u32) {
        self.unauthorized_responses = count;
    }

    /// Invalidate the active token, as if it had been revoked.
    pub fn revoke_token(&mut self) {
        self.active_token = None;
    }

    /// Check credentials and issue a new token, replacing the previous one.
    pub fn issue_token(&mut self, username: &str, password: &str) -> Option<String> {
        if username != self.username || password != self.password {
            return None;
        }
        self.tokens_issued += 1;
        let token = format!("mock-token-{}", self.tokens_issued);
        self.active_token = Some(token.clone());
        Some(token)
    }

    /// Whether a request carrying `authorization` may proceed.
    pub fn authorize(&mut self, authorization: Option<&str>) -> bool {
        if self.unauthorized_responses > 0 {
            self.unauthorized_responses -= 1;
            return false;
        }
        match (&self.active_token, authorization) {
            (Some(token), Some(header)) => header.strip_prefix("Bearer ") == Some(token.as_str()),
            _ => false,
        }
    }

    /// Slice `items` into the page at `index`, returning the page total too.
    pub fn page_of<T: Clone>(&self, items: &[T], index: usize) -> (usize, Vec<T>) {
        let pages = items.len().div_ceil(self.page_size);
        let page = items
            .chunks(self.page_size)
            .nth(index)
            .map(<[T]>::to_vec)
            .unwrap_or_default();
        (pages, page)
    }
}

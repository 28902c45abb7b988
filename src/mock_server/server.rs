//! Mock Zaptec API server.
//!
//! Provides an axum-based HTTP server that simulates the Zaptec API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::handlers;
use super::state::{MockState, DEFAULT_PASSWORD, DEFAULT_USERNAME};
use crate::{ClientConfig, Credentials};

/// Installation id the default client config reports on.
pub const MOCK_INSTALLATION_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

/// A mock Zaptec API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic, stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a mock server with empty state.
    pub async fn start() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Client configuration pointing at this server with credentials it
    /// accepts.
    pub fn client_config(&self) -> ClientConfig {
        let credentials =
            Credentials::new(DEFAULT_USERNAME, DEFAULT_PASSWORD, MOCK_INSTALLATION_ID)
                .expect("mock credentials are non-empty");
        ClientConfig::new(credentials).with_base_url(self.url.clone())
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Token exchange
            .route("/oauth/token", post(handlers::issue_token))
            // Charge history
            .route("/api/chargehistory", get(handlers::list_charge_history))
            .route(
                "/api/chargehistory/installationreport",
                post(handlers::installation_report),
            )
            // Chargers and installations
            .route("/api/chargers", get(handlers::list_chargers))
            .route("/api/installation", get(handlers::list_installations))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

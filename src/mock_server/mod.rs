//! Mock Zaptec API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Zaptec
//! API for integration and end-to-end testing. Unlike wiremock which mocks
//! at the HTTP level per-test, this server maintains state across requests
//! (issued tokens, forced authorization failures, paged data), enabling
//! realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use zaptecapi::mock_server::{Fixtures, MockServer, MockState};
//! use zaptecapi::ZaptecClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let state = MockState::new().with_sessions(Fixtures::sessions_in_february(3));
//!     let server = MockServer::with_state(state).await;
//!     let client = ZaptecClient::new(server.client_config()).unwrap();
//!
//!     let range = Fixtures::february();
//!     let sessions = client.charging_sessions(range.from(), range.to()).await.unwrap();
//!     assert_eq!(sessions.len(), 3);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::Fixtures;
pub use server::{MockServer, MOCK_INSTALLATION_ID};
pub use state::MockState;

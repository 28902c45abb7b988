//! Zaptec API client library.
//!
//! A Rust client for the Zaptec charging cloud API. It exchanges account
//! credentials for short-lived access tokens, refreshes them before they
//! expire, walks paginated result sets, and validates every response
//! against the record shape it is expected to have, so an upstream API
//! change surfaces as a [`ZaptecError::SchemaValidation`] instead of
//! silently corrupting downstream reports.
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::Utc;
//! use zaptecapi::{DateRange, ZaptecClient};
//!
//! #[tokio::main]
//! async fn main() -> zaptecapi::Result<()> {
//!     // Read credentials from environment variables
//!     let client = ZaptecClient::new(zaptecapi::config::from_env()?)?;
//!
//!     let range = DateRange::previous_month(Utc::now().date_naive());
//!
//!     // Every session of last month, all pages
//!     let sessions = client.charging_sessions(range.from(), range.to()).await?;
//!     println!("Found {} sessions", sessions.len());
//!
//!     // Per-user totals
//!     let report = client.installation_report(range.from(), range.to()).await?;
//!     println!("{} kWh in total", report.total_energy());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`TokenManager`] - credential exchange and expiry tracking
//! - [`HttpClient`] - authenticated transport with a single retry on 401
//! - [`Paginator`] - walks `pageIndex`-paged list endpoints
//! - [`schema`] - structural validation of raw responses
//! - [`ZaptecClient`] - the documented operations
//!
//! Record types implement [`List`] or [`Get`] depending on their endpoint.
//!
//! # Configuration
//!
//! [`config::from_env`] reads:
//!
//! - `ZAPTEC_USERNAME`, `ZAPTEC_PASSWORD`, `ZAPTEC_INSTALLATION_ID` (required)
//! - `ZAPTEC_API_URL` (optional) - Base URL (defaults to `https://api.zaptec.com`)
//! - `ZAPTEC_TIMEOUT_SECS` (optional) - Per-request timeout

mod auth;
pub mod cli;
mod client;
pub mod config;
mod dates;
mod error;
mod models;
mod output;
mod pagination;
pub mod schema;
mod traits;
mod zaptec;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::{Credentials, TokenManager, TokenState, SAFETY_BUFFER_SECS};
pub use client::{ClientConfig, HttpClient, RawResponse, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use dates::DateRange;
pub use error::{Result, ZaptecError};
pub use output::PrettyPrint;
pub use pagination::{CancelFlag, Page, Paginator, MAX_PAGES, PAGE_INDEX_PARAM};
pub use zaptec::ZaptecClient;

// Re-export traits
pub use traits::{Get, List};

// Re-export models
pub use models::{
    // Charge history
    ChargeHistoryQuery,
    ChargerFirmware,
    ChargingSession,
    // Chargers and installations
    Charger,
    Installation,
    InstallationUser,
    // Installation report
    InstallationReport,
    ReportQuery,
    ReportRequestBody,
    TotalUserChargerReport,
    UserDetails,
};

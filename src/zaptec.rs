//! High-level Zaptec client.
//!
//! [`ZaptecClient`] composes the authenticated transport, the paginator and
//! response validation into the operations consumed by report generation.
//! Construct one per process and pass it to whoever needs it.

use chrono::{DateTime, Utc};

use crate::client::{ClientConfig, HttpClient};
use crate::dates::DateRange;
use crate::error::Result;
use crate::models::{
    ChargeHistoryQuery, Charger, ChargingSession, Installation, InstallationReport, ReportQuery,
};
use crate::pagination::{CancelFlag, Paginator, MAX_PAGES};
use crate::traits::{Get, List};

/// Client for the documented Zaptec operations.
///
/// # Example
///
/// ```no_run
/// use chrono::Utc;
/// use zaptecapi::{ClientConfig, Credentials, DateRange, ZaptecClient};
///
/// # async fn example() -> zaptecapi::Result<()> {
/// let credentials = Credentials::new("user@example.com", "secret", "installation-id")?;
/// let client = ZaptecClient::new(ClientConfig::new(credentials))?;
///
/// let range = DateRange::previous_month(Utc::now().date_naive());
/// let sessions = client.charging_sessions(range.from(), range.to()).await?;
/// println!("{} sessions", sessions.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ZaptecClient {
    http: HttpClient,
    max_pages: u32,
    cancel: Option<CancelFlag>,
}

impl ZaptecClient {
    /// Open a client session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured base URL is invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_http(HttpClient::new(config)?))
    }

    /// Wrap an existing transport.
    pub fn from_http(http: HttpClient) -> Self {
        Self {
            http,
            max_pages: MAX_PAGES,
            cancel: None,
        }
    }

    /// Lower the page-count bound for listing operations.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Allow listing operations to be abandoned between pages.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The underlying transport.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// End the session explicitly.
    pub fn close(self) {
        self.http.close();
    }

    fn paginator(&self) -> Paginator<'_> {
        let paginator = Paginator::new(&self.http).with_max_pages(self.max_pages);
        match &self.cancel {
            Some(cancel) => paginator.with_cancel_flag(cancel.clone()),
            None => paginator,
        }
    }

    fn installation_id(&self) -> &str {
        self.http.credentials().installation_id()
    }

    /// Every charging session of the installation in `[from, to]`, across
    /// all pages, in server order.
    ///
    /// # Errors
    ///
    /// Returns [`ZaptecError::InvalidArgument`](crate::ZaptecError::InvalidArgument)
    /// before any request if `from > to`; otherwise any transport,
    /// pagination or validation error.
    #[tracing::instrument(skip(self))]
    pub async fn charging_sessions(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ChargingSession>> {
        let range = DateRange::new(from, to)?;
        let query = ChargeHistoryQuery::new(self.installation_id(), range);

        let sessions = ChargingSession::list_all_with(&self.paginator(), &query).await?;
        tracing::info!(count = sessions.len(), "fetched charging sessions");
        Ok(sessions)
    }

    /// Per-user totals for the installation in `[from, to]`.
    ///
    /// # Errors
    ///
    /// Same as [`ZaptecClient::charging_sessions`].
    #[tracing::instrument(skip(self))]
    pub async fn installation_report(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<InstallationReport> {
        let range = DateRange::new(from, to)?;
        let query = ReportQuery::new(self.installation_id(), range);

        InstallationReport::get(&self.http, &query).await
    }

    /// Installations visible to the account.
    pub async fn installations(&self) -> Result<Vec<Installation>> {
        Installation::list_all_with(&self.paginator(), &()).await
    }

    /// Chargers visible to the account.
    pub async fn chargers(&self) -> Result<Vec<Charger>> {
        Charger::list_all_with(&self.paginator(), &()).await
    }
}

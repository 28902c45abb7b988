//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::HttpClient;
use crate::error::Result;
use crate::schema::Record;

/// Fetch a single, unpaginated resource.
///
/// # Example
///
/// ```ignore
/// use zaptecapi::{DateRange, Get, InstallationReport, ReportQuery};
///
/// let query = ReportQuery::new("installation-id", DateRange::new(from, to)?);
/// let report = InstallationReport::get(client.http(), &query).await?;
/// ```
#[async_trait]
pub trait Get: Record {
    /// Parameters identifying the resource.
    type Params: Send + Sync;

    /// Endpoint path relative to the API base URL.
    const PATH: &'static str;

    /// Fetch and validate the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response does not
    /// match the record's schema.
    async fn get(client: &HttpClient, params: &Self::Params) -> Result<Self>;
}

//! List trait for fetching paginated collections.

use async_trait::async_trait;

use crate::client::HttpClient;
use crate::error::Result;
use crate::pagination::{Page, Paginator};
use crate::schema::Record;

/// List records from a paginated endpoint.
///
/// Implementors only describe the endpoint; paging, validation and
/// termination are handled by [`Paginator`].
///
/// # Example
///
/// ```ignore
/// use zaptecapi::{Charger, List};
///
/// // Fetch a single page
/// let page = Charger::list_page(client.http(), &(), 0).await?;
///
/// // Fetch all pages
/// let chargers = Charger::list_all(client.http(), &()).await?;
/// ```
#[async_trait]
pub trait List: Record {
    /// Query parameters for filtering.
    type Query: Send + Sync;

    /// Endpoint path relative to the API base URL.
    const PATH: &'static str;

    /// Query parameters for `query`, excluding the page index.
    fn params(query: &Self::Query) -> Vec<(String, String)>;

    /// Fetch one page (zero-based index).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page does not validate.
    async fn list_page(client: &HttpClient, query: &Self::Query, index: u32) -> Result<Page<Self>> {
        Paginator::new(client)
            .fetch_page(Self::PATH, &Self::params(query), index)
            .await
    }

    /// Fetch every page.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &HttpClient, query: &Self::Query) -> Result<Vec<Self>> {
        Self::list_all_with(&Paginator::new(client), query).await
    }

    /// Fetch every page using a configured paginator (bounds, cancellation).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all_with(paginator: &Paginator<'_>, query: &Self::Query) -> Result<Vec<Self>> {
        paginator.fetch_all(Self::PATH, &Self::params(query)).await
    }
}

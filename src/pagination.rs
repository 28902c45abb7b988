//! Pagination over Zaptec list endpoints.
//!
//! List endpoints take a zero-based `pageIndex` and answer with
//! `{"Pages": total, "Data": [...]}`. [`Paginator::fetch_all`] walks the
//! pages in order and concatenates their items.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::client::HttpClient;
use crate::error::{Result, ZaptecError};
use crate::schema::{self, Record};

/// Query parameter carrying the zero-based page index.
pub const PAGE_INDEX_PARAM: &str = "pageIndex";

/// Maximum pages to fetch (safety limit).
pub const MAX_PAGES: u32 = 10_000;

/// A page of results from a list endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// Zero-based page index.
    pub index: u32,
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of pages reported by the server.
    pub total_pages: u32,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(index: u32, items: Vec<T>, total_pages: u32) -> Self {
        Self {
            index,
            items,
            total_pages,
        }
    }

    /// Whether the server reports pages after this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.index.saturating_add(1) < self.total_pages
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            index: self.index,
            items: self.items.into_iter().map(f).collect(),
            total_pages: self.total_pages,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Shared flag for abandoning a multi-page fetch between pages.
///
/// An in-flight page request is never interrupted; the flag is checked
/// before the next page is requested.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Accumulates every page of a list endpoint.
#[derive(Debug, Clone)]
pub struct Paginator<'a> {
    client: &'a HttpClient,
    max_pages: u32,
    cancel: Option<CancelFlag>,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self {
            client,
            max_pages: MAX_PAGES,
            cancel: None,
        }
    }

    /// Lower the page-count bound.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Fetch and validate the page at `index`.
    ///
    /// `pageIndex` is merged into `params`, replacing any caller-supplied
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the page does not validate.
    pub async fn fetch_page<T: Record>(
        &self,
        path: &str,
        params: &[(String, String)],
        index: u32,
    ) -> Result<Page<T>> {
        let mut query: Vec<(String, String)> = params
            .iter()
            .filter(|(key, _)| key != PAGE_INDEX_PARAM)
            .cloned()
            .collect();
        query.push((PAGE_INDEX_PARAM.to_string(), index.to_string()));

        let response = self.client.get_with_query(path, &query).await?;
        let (total_pages, items) = schema::validate_page::<T>(response.json()?)?;

        tracing::debug!(path, index, total_pages, items = items.len(), "fetched page");

        Ok(Page::new(index, items, total_pages))
    }

    /// Fetch every page in order and concatenate the items.
    ///
    /// The total reported by the first page is authoritative. Fetching
    /// stops once that many pages were consumed, or at the first empty
    /// page.
    ///
    /// # Errors
    ///
    /// Returns [`ZaptecError::Pagination`] if the reported total exceeds
    /// the page bound or is inconsistent with the first page,
    /// [`ZaptecError::Cancelled`] if the cancel flag was raised, and any
    /// error from the page requests.
    #[tracing::instrument(skip(self, params))]
    pub async fn fetch_all<T: Record>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<T>> {
        let first = self.fetch_page::<T>(path, params, 0).await?;
        let total_pages = first.total_pages;

        if total_pages > self.max_pages {
            return Err(ZaptecError::Pagination(format!(
                "server reports {total_pages} pages, more than the limit of {}",
                self.max_pages
            )));
        }

        if first.is_empty() {
            return Ok(first.items);
        }

        if total_pages == 0 {
            return Err(ZaptecError::Pagination(format!(
                "first page has {} items but the server reports 0 pages",
                first.len()
            )));
        }

        let mut items = first.items;
        let mut fetched = 1;

        while fetched < total_pages {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                tracing::info!(path, fetched, total_pages, "pagination cancelled");
                return Err(ZaptecError::Cancelled);
            }

            let page = self.fetch_page::<T>(path, params, fetched).await?;
            if page.is_empty() {
                tracing::debug!(path, index = fetched, total_pages, "empty page, stopping early");
                break;
            }

            items.extend(page.items);
            fetched += 1;
        }

        tracing::debug!(path, pages = fetched, items = items.len(), "fetched all pages");
        Ok(items)
    }
}

use std::future::Future;
use std::sync::Arc;

use serde::Deserialize;
use wanderlust_core::{ListingSummary, SearchCriteria};

use crate::error::ClientError;

/// One page of listings as returned by the query endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedPage {
    pub items: Vec<ListingSummary>,
    pub has_more: bool,
}

/// Anything that can produce pages of listings for a set of criteria.
///
/// [`crate::ListingsClient`] is the HTTP implementation; tests substitute
/// in-memory sources.
pub trait ListingSource {
    fn fetch_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<FetchedPage, ClientError>> + Send;
}

impl<T: ListingSource> ListingSource for Arc<T> {
    fn fetch_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<FetchedPage, ClientError>> + Send {
        (**self).fetch_page(criteria, page, page_size)
    }
}

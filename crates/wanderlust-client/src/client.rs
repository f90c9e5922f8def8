//! HTTP client for the listing query endpoint.
//!
//! Wraps `reqwest` with the server's response envelope and maps transport,
//! status, and decoding failures onto [`ClientError`].

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use wanderlust_core::{ClientConfig, SearchCriteria};

use crate::error::ClientError;
use crate::source::{FetchedPage, ListingSource};

const LISTINGS_PATH: &str = "api/v1/listings";

/// `{ "data": ..., "meta": ... }` wrapper every server response carries.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Client for the Wanderlust listing API.
pub struct ListingsClient {
    client: Client,
    listings_url: Url,
}

impl ListingsClient {
    /// Creates a client from the browsing configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`ListingsClient::new`].
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joining keeps any path prefix.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let listings_url = Url::parse(&normalised)
            .and_then(|base| base.join(LISTINGS_PATH))
            .map_err(|e| invalid(e.to_string()))?;
        if listings_url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".to_string()));
        }

        Ok(Self {
            client,
            listings_url,
        })
    }

    /// Fetches one page of listings matching `criteria`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure or timeout.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ClientError::Deserialize`] if the body is not a listings page.
    pub async fn fetch_listings(
        &self,
        criteria: &SearchCriteria,
        page: u32,
        page_size: u32,
    ) -> Result<FetchedPage, ClientError> {
        let url = self.build_url(criteria, page, page_size);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: Envelope<FetchedPage> =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: format!("listings page {page}"),
                source: e,
            })?;

        tracing::debug!(
            page,
            items = envelope.data.items.len(),
            has_more = envelope.data.has_more,
            "fetched listings page"
        );
        Ok(envelope.data)
    }

    /// Builds the query endpoint URL. Absent criteria are omitted; values are
    /// form-encoded.
    fn build_url(&self, criteria: &SearchCriteria, page: u32, page_size: u32) -> Url {
        let mut url = self.listings_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("pageSize", &page_size.to_string());
            if let Some(text) = &criteria.free_text {
                pairs.append_pair("q", text);
            }
            if let Some(range) = criteria.price_range {
                pairs.append_pair("priceRange", &range.to_string());
            }
            if let Some(country) = &criteria.country {
                pairs.append_pair("country", country);
            }
            if let Some(category) = &criteria.category {
                pairs.append_pair("category", category);
            }
        }
        url
    }
}

impl ListingSource for ListingsClient {
    fn fetch_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<FetchedPage, ClientError>> + Send {
        self.fetch_listings(criteria, page, page_size)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

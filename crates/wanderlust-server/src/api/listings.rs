use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use wanderlust_core::{ListingDetail, ListingId, ListingSummary, SearchCriteria};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

/// Where an empty search sends the user.
pub(super) const UNFILTERED_LISTINGS_PATH: &str = "/api/v1/listings";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListingsPage {
    pub items: Vec<ListingSummary>,
    pub has_more: bool,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResults {
    /// The search text or category token the page was produced for.
    pub query: String,
    #[serde(flatten)]
    pub results: ListingsPage,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListingsQuery {
    pub page: Option<u32>,
    #[serde(rename = "pageSize", alias = "limit")]
    pub page_size: Option<u32>,
    pub q: Option<String>,
    #[serde(rename = "priceRange")]
    pub price_range: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
}

impl ListingsQuery {
    pub(super) fn criteria(&self) -> SearchCriteria {
        let mut criteria = SearchCriteria::default()
            .with_free_text(self.q.as_deref().unwrap_or_default())
            .with_price_range(self.price_range.as_deref().unwrap_or_default())
            .with_country(self.country.as_deref().unwrap_or_default());
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            criteria.category = Some(category.to_string());
        }
        criteria
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    #[serde(rename = "pageSize", alias = "limit")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PageQuery {
    pub page: Option<u32>,
    #[serde(rename = "pageSize", alias = "limit")]
    pub page_size: Option<u32>,
}

/// Unwraps query parameters, turning a malformed query string into a
/// `bad_request` envelope instead of axum's plain-text rejection.
fn query_params<T>(
    query: Result<Query<T>, QueryRejection>,
    req_id: &RequestId,
) -> Result<T, ApiError> {
    query.map(|Query(params)| params).map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })
}

/// Runs the listing query for one page and shapes it for the wire.
async fn fetch_page(
    state: &AppState,
    req_id: &RequestId,
    criteria: &SearchCriteria,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<ListingsPage, ApiError> {
    let page = page.unwrap_or(1).max(1);
    let page_size = state.page_limits.normalize_page_size(page_size);

    let result = wanderlust_db::query_listings(&state.pool, criteria, page, page_size)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(ListingsPage {
        items: result.items,
        has_more: result.has_more,
        page,
        page_size,
    })
}

/// Query endpoint backing infinite scroll.
pub(super) async fn list_listings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ListingsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ListingsPage>>, ApiError> {
    let query = query_params(query, &req_id)?;
    let criteria = query.criteria();
    let data = fetch_page(&state, &req_id, &criteria, query.page, query.page_size).await?;
    Ok(Json(ApiResponse::new(data, req_id.0)))
}

/// Free-text search entry point. An empty query redirects to the unfiltered
/// listing view.
pub(super) async fn search_listings(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(query, &req_id)?;
    let Some(text) = query.q.filter(|q| !q.is_empty()) else {
        return Ok(Redirect::to(UNFILTERED_LISTINGS_PATH).into_response());
    };

    let criteria = SearchCriteria::text(&text);
    let results = fetch_page(&state, &req_id, &criteria, query.page, query.page_size).await?;
    Ok(Json(ApiResponse::new(
        SearchResults {
            query: text,
            results,
        },
        req_id.0,
    ))
    .into_response())
}

/// Category browse entry point.
pub(super) async fn browse_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(category): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let query = query_params(query, &req_id)?;
    let criteria = SearchCriteria::category(&category);
    let results = fetch_page(&state, &req_id, &criteria, query.page, query.page_size).await?;
    Ok(Json(ApiResponse::new(
        SearchResults {
            query: category,
            results,
        },
        req_id.0,
    )))
}

pub(super) async fn show_listing(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<ListingDetail>>, ApiError> {
    let id: ListingId = raw_id.parse().map_err(|_| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("invalid listing id: {raw_id}"),
        )
    })?;

    let detail = wanderlust_db::get_listing(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(detail, req_id.0)))
}

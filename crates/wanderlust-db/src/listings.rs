//! Listing Query Service: paginated, filtered reads over `listings`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use wanderlust_core::{
    sanitize_pattern, ListingDetail, ListingId, ListingSummary, SearchCriteria,
};

use crate::DbError;

/// Full `listings` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub country: String,
    pub price: i64,
    pub image_url: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ListingRow {
    #[must_use]
    pub fn into_summary(self) -> ListingSummary {
        self.into_detail().summary
    }

    #[must_use]
    pub fn into_detail(self) -> ListingDetail {
        let Self {
            id,
            title,
            description,
            location,
            country,
            price,
            image_url,
            category,
            created_at,
        } = self;

        ListingDetail {
            summary: ListingSummary {
                id: ListingId(id),
                title,
                location,
                country,
                // `price >= 0` is enforced by a table constraint.
                price: u64::try_from(price).unwrap_or(0),
                image_url,
            },
            description,
            category,
            created_at,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub items: Vec<ListingSummary>,
    /// `true` iff the next page would be non-empty.
    pub has_more: bool,
}

/// Returns page `page` (1-indexed, values below 1 read as 1) of listings
/// matching `criteria`, at most `page_size` items, ordered by creation time
/// then id.
///
/// Free text is sanitized and matched case-insensitively against `title` OR
/// `location`. Category and country are exact matches (country ignores
/// case). All present criteria are ANDed. An empty page is a successful
/// result.
///
/// One extra row is fetched to decide `has_more`; it is not returned.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or the pool is unreachable.
pub async fn query_listings(
    pool: &PgPool,
    criteria: &SearchCriteria,
    page: u32,
    page_size: u32,
) -> Result<ListingPage, DbError> {
    let page_size = page_size.max(1);
    let offset = i64::from(page.max(1) - 1) * i64::from(page_size);
    let fetch_limit = i64::from(page_size) + 1;

    let pattern = criteria.free_text.as_deref().map(sanitize_pattern);
    let (min_price, max_price) = match criteria.price_range {
        Some(range) => (
            Some(to_bigint(range.min)),
            range.max.map(to_bigint),
        ),
        None => (None, None),
    };

    let mut rows = sqlx::query_as::<_, ListingRow>(
        "SELECT \
             id, title, description, location, country, price, image_url, \
             category, created_at \
         FROM listings \
         WHERE ($1::TEXT IS NULL OR title ~* $1 OR location ~* $1) \
           AND ($2::TEXT IS NULL OR category = $2) \
           AND ($3::BIGINT IS NULL OR price >= $3) \
           AND ($4::BIGINT IS NULL OR price <= $4) \
           AND ($5::TEXT IS NULL OR lower(country) = lower($5)) \
         ORDER BY created_at ASC, id ASC \
         LIMIT $6 OFFSET $7",
    )
    .bind(pattern)
    .bind(criteria.category.as_deref())
    .bind(min_price)
    .bind(max_price)
    .bind(criteria.country.as_deref())
    .bind(fetch_limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let has_more = rows.len() > page_size as usize;
    rows.truncate(page_size as usize);

    tracing::debug!(
        page,
        page_size,
        returned = rows.len(),
        has_more,
        "listing page queried"
    );

    Ok(ListingPage {
        items: rows.into_iter().map(ListingRow::into_summary).collect(),
        has_more,
    })
}

/// Fetches one listing by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no listing has `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_listing(pool: &PgPool, id: ListingId) -> Result<ListingDetail, DbError> {
    let row = sqlx::query_as::<_, ListingRow>(
        "SELECT \
             id, title, description, location, country, price, image_url, \
             category, created_at \
         FROM listings \
         WHERE id = $1",
    )
    .bind(id.0)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row.into_detail())
}

fn to_bigint(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

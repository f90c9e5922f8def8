//! Live integration tests for wanderlust-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/wanderlust-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use std::collections::HashSet;

use uuid::Uuid;
use wanderlust_core::{ListingId, PriceRange, SearchCriteria};
use wanderlust_db::{get_listing, query_listings, DbError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Seed<'a> {
    title: &'a str,
    location: &'a str,
    country: &'a str,
    price: i64,
    category: Option<&'a str>,
}

impl<'a> Seed<'a> {
    fn new(title: &'a str, location: &'a str, country: &'a str, price: i64) -> Self {
        Self {
            title,
            location,
            country,
            price,
            category: None,
        }
    }

    fn category(mut self, category: &'a str) -> Self {
        self.category = Some(category);
        self
    }
}

/// Inserts `seeds` with strictly increasing `created_at` so insertion order
/// is the query order. Returns the ids in that order.
async fn insert_listings(pool: &sqlx::PgPool, seeds: &[Seed<'_>]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(seeds.len());
    for (offset, seed) in seeds.iter().enumerate() {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO listings \
             (id, title, description, location, country, price, image_url, category, created_at) \
             VALUES ($1, $2, 'seeded', $3, $4, $5, 'https://cdn.example.com/x.jpg', $6, \
                     TIMESTAMPTZ '2026-01-01 00:00:00+00' + make_interval(secs => $7))",
        )
        .bind(id)
        .bind(seed.title)
        .bind(seed.location)
        .bind(seed.country)
        .bind(seed.price)
        .bind(seed.category)
        .bind(i32::try_from(offset).expect("offset fits"))
        .execute(pool)
        .await
        .unwrap_or_else(|e| panic!("insert_listings failed for '{}': {e}", seed.title));
        ids.push(id);
    }
    ids
}

fn numbered_seeds(titles: &[String]) -> Vec<Seed<'_>> {
    titles
        .iter()
        .map(|t| Seed::new(t, "Lisbon", "Portugal", 100))
        .collect()
}

fn ids_of(page: &wanderlust_db::ListingPage) -> Vec<Uuid> {
    page.items.iter().map(|l| l.id.0).collect()
}

// ---------------------------------------------------------------------------
// Section 1: Pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn unconstrained_query_returns_all_in_creation_order(pool: sqlx::PgPool) {
    let titles: Vec<String> = (0..5).map(|i| format!("Listing {i}")).collect();
    let ids = insert_listings(&pool, &numbered_seeds(&titles)).await;

    let page = query_listings(&pool, &SearchCriteria::default(), 1, 10)
        .await
        .expect("query_listings failed");

    assert_eq!(ids_of(&page), ids);
    assert!(!page.has_more);
}

#[sqlx::test(migrations = "../../migrations")]
async fn concatenated_pages_have_no_gaps_or_duplicates(pool: sqlx::PgPool) {
    let titles: Vec<String> = (0..7).map(|i| format!("Listing {i}")).collect();
    let ids = insert_listings(&pool, &numbered_seeds(&titles)).await;
    let criteria = SearchCriteria::default();

    let mut collected = Vec::new();
    let mut has_more_flags = Vec::new();
    for page_number in 1..=3 {
        let page = query_listings(&pool, &criteria, page_number, 3)
            .await
            .expect("query_listings failed");
        collected.extend(ids_of(&page));
        has_more_flags.push(page.has_more);
    }

    assert_eq!(collected, ids);
    assert_eq!(has_more_flags, vec![true, true, false]);
    let unique: HashSet<_> = collected.iter().collect();
    assert_eq!(unique.len(), collected.len());
}

#[sqlx::test(migrations = "../../migrations")]
async fn exact_multiple_of_page_size_reports_no_more_on_last_page(pool: sqlx::PgPool) {
    let titles: Vec<String> = (0..4).map(|i| format!("Listing {i}")).collect();
    insert_listings(&pool, &numbered_seeds(&titles)).await;

    let second = query_listings(&pool, &SearchCriteria::default(), 2, 2)
        .await
        .expect("query_listings failed");
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_more);
}

#[sqlx::test(migrations = "../../migrations")]
async fn page_past_the_end_is_empty_not_an_error(pool: sqlx::PgPool) {
    let titles: Vec<String> = (0..2).map(|i| format!("Listing {i}")).collect();
    insert_listings(&pool, &numbered_seeds(&titles)).await;

    let page = query_listings(&pool, &SearchCriteria::default(), 9, 12)
        .await
        .expect("query_listings failed");
    assert!(page.items.is_empty());
    assert!(!page.has_more);
}

#[sqlx::test(migrations = "../../migrations")]
async fn page_zero_reads_as_first_page(pool: sqlx::PgPool) {
    let titles: Vec<String> = (0..2).map(|i| format!("Listing {i}")).collect();
    let ids = insert_listings(&pool, &numbered_seeds(&titles)).await;

    let page = query_listings(&pool, &SearchCriteria::default(), 0, 12)
        .await
        .expect("query_listings failed");
    assert_eq!(ids_of(&page), ids);
}

// ---------------------------------------------------------------------------
// Section 2: Free-text search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn free_text_matches_title_or_location(pool: sqlx::PgPool) {
    let ids = insert_listings(
        &pool,
        &[
            Seed::new("Flat in Paris", "Paris", "France", 150),
            Seed::new("Cabin", "Lyon", "France", 90),
        ],
    )
    .await;

    let page = query_listings(&pool, &SearchCriteria::text("Paris"), 1, 12)
        .await
        .expect("query_listings failed");
    assert_eq!(ids_of(&page), vec![ids[0]]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn free_text_is_case_insensitive_and_ignores_country(pool: sqlx::PgPool) {
    let ids = insert_listings(
        &pool,
        &[
            Seed::new("Villa", "Lyon", "France", 300),
            Seed::new("Chalet", "Zermatt", "Switzerland", 400),
        ],
    )
    .await;

    let by_location = query_listings(&pool, &SearchCriteria::text("lYoN"), 1, 12)
        .await
        .expect("query_listings failed");
    assert_eq!(ids_of(&by_location), vec![ids[0]]);

    let by_country = query_listings(&pool, &SearchCriteria::text("Switzerland"), 1, 12)
        .await
        .expect("query_listings failed");
    assert!(by_country.items.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn metacharacters_in_free_text_match_literally(pool: sqlx::PgPool) {
    let ids = insert_listings(
        &pool,
        &[
            Seed::new("Cottage", "St. Ives", "UK", 120),
            Seed::new("Cottage", "Sty Ives", "UK", 120),
        ],
    )
    .await;

    let page = query_listings(&pool, &SearchCriteria::text("St. Ives"), 1, 12)
        .await
        .expect("query_listings failed");
    assert_eq!(ids_of(&page), vec![ids[0]]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn malformed_pattern_input_does_not_error(pool: sqlx::PgPool) {
    insert_listings(&pool, &[Seed::new("Loft", "Berlin", "Germany", 80)]).await;

    for input in ["(a+)+$", "[", "\\", "a{2,", "#|?"] {
        let page = query_listings(&pool, &SearchCriteria::text(input), 1, 12)
            .await
            .unwrap_or_else(|e| panic!("query for {input:?} failed: {e}"));
        assert!(page.items.is_empty(), "{input:?} should match nothing");
    }
}

// ---------------------------------------------------------------------------
// Section 3: Category, price, and country
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn category_is_an_exact_match(pool: sqlx::PgPool) {
    let ids = insert_listings(
        &pool,
        &[
            Seed::new("Keep", "Edinburgh", "UK", 500).category("castles"),
            Seed::new("Tower", "Dover", "UK", 450).category("castles-lite"),
            Seed::new("Hut", "Oslo", "Norway", 60),
        ],
    )
    .await;

    let page = query_listings(&pool, &SearchCriteria::category("castles"), 1, 12)
        .await
        .expect("query_listings failed");
    assert_eq!(ids_of(&page), vec![ids[0]]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn price_range_and_country_are_conjunctive(pool: sqlx::PgPool) {
    let ids = insert_listings(
        &pool,
        &[
            Seed::new("A", "Rome", "Italy", 150),
            Seed::new("B", "Rome", "Italy", 250),
            Seed::new("C", "Nice", "France", 150),
        ],
    )
    .await;

    let criteria = SearchCriteria::default()
        .with_price_range("100-200")
        .with_country("italy");
    let page = query_listings(&pool, &criteria, 1, 12)
        .await
        .expect("query_listings failed");
    assert_eq!(ids_of(&page), vec![ids[0]]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn unbounded_price_range_has_no_ceiling(pool: sqlx::PgPool) {
    let ids = insert_listings(
        &pool,
        &[
            Seed::new("Budget", "Porto", "Portugal", 40),
            Seed::new("Palace", "Porto", "Portugal", 9_000),
        ],
    )
    .await;

    let criteria = SearchCriteria {
        price_range: Some(PriceRange::new(500, None)),
        ..SearchCriteria::default()
    };
    let page = query_listings(&pool, &criteria, 1, 12)
        .await
        .expect("query_listings failed");
    assert_eq!(ids_of(&page), vec![ids[1]]);
}

// ---------------------------------------------------------------------------
// Section 4: Detail lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn get_listing_returns_detail(pool: sqlx::PgPool) {
    let ids = insert_listings(
        &pool,
        &[Seed::new("Treehouse", "Bergen", "Norway", 210).category("treehouses")],
    )
    .await;

    let detail = get_listing(&pool, ListingId(ids[0]))
        .await
        .expect("get_listing failed");
    assert_eq!(detail.summary.title, "Treehouse");
    assert_eq!(detail.description, "seeded");
    assert_eq!(detail.category.as_deref(), Some("treehouses"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_listing_unknown_id_is_not_found(pool: sqlx::PgPool) {
    let result = get_listing(&pool, ListingId::new_v4()).await;
    assert!(matches!(result, Err(DbError::NotFound)), "got: {result:?}");
}

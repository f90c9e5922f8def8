use wanderlust_core::{PriceRange, SearchCriteria};

use super::*;

fn test_client(base_url: &str) -> ListingsClient {
    ListingsClient::with_base_url(base_url, 30, "wanderlust-test")
        .expect("client construction should not fail")
}

#[test]
fn build_url_sends_paging_only_for_unconstrained_criteria() {
    let client = test_client("http://localhost:3000");
    let url = client.build_url(&SearchCriteria::default(), 2, 12);
    assert_eq!(
        url.as_str(),
        "http://localhost:3000/api/v1/listings?page=2&pageSize=12"
    );
}

#[test]
fn build_url_includes_present_criteria() {
    let client = test_client("http://localhost:3000/");
    let criteria = SearchCriteria {
        free_text: Some("Paris".to_string()),
        price_range: Some(PriceRange::new(100, Some(200))),
        country: Some("France".to_string()),
        category: Some("rooms".to_string()),
    };
    let url = client.build_url(&criteria, 1, 6);
    assert_eq!(
        url.as_str(),
        "http://localhost:3000/api/v1/listings?page=1&pageSize=6&q=Paris&priceRange=100-200&country=France&category=rooms"
    );
}

#[test]
fn build_url_encodes_unbounded_price_and_spaces() {
    let client = test_client("http://localhost:3000");
    let criteria = SearchCriteria::text("St. Ives").with_price_range("500+");
    let url = client.build_url(&criteria, 1, 12);
    assert!(url.as_str().contains("q=St.+Ives"), "{url}");
    assert!(url.as_str().contains("priceRange=500%2B"), "{url}");
}

#[test]
fn base_url_path_prefix_is_kept() {
    let client = test_client("http://localhost:3000/gateway");
    let url = client.build_url(&SearchCriteria::default(), 1, 12);
    assert!(
        url.as_str()
            .starts_with("http://localhost:3000/gateway/api/v1/listings?"),
        "{url}"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = ListingsClient::with_base_url("not a url", 30, "wanderlust-test");
    assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
}

#[test]
fn new_uses_configured_base_url() {
    let config = ClientConfig {
        api_base_url: "http://listings.internal:8080/".to_string(),
        page_size: 12,
        filter_debounce_ms: 300,
        request_timeout_secs: 30,
        user_agent: "wanderlust-test".to_string(),
    };
    let client = ListingsClient::new(&config).expect("client");
    let url = client.build_url(&SearchCriteria::default(), 3, 12);
    assert_eq!(
        url.as_str(),
        "http://listings.internal:8080/api/v1/listings?page=3&pageSize=12"
    );
}

//! Product retrieval tests against the stub commerce API.
//!
//! Covers envelope normalization (single object vs. array metadata),
//! credential attachment, response caching, and error surfacing.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use green_papaya_core::{ProductId, StockStatus};
use green_papaya_integration_tests::{
    STUB_ACCESS_TOKEN, STUB_CUSTOMER_ID, STUB_PASSWORD, StubApi,
};
use green_papaya_storefront::api::{ApiClient, ApiError};
use green_papaya_storefront::services::session::SessionStore;
use green_papaya_storefront::storage::{KeyValueStore, MemoryStore};

fn api_client(stub: &StubApi, storage: &Arc<dyn KeyValueStore>) -> ApiClient {
    let config = stub.config(std::path::Path::new(".unused"));
    ApiClient::new(&config, Arc::clone(storage)).unwrap()
}

#[tokio::test]
async fn published_products_decode_from_array_metadata() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = api_client(&stub, &storage);

    let products = api.get_published_products().await.unwrap();
    assert_eq!(products.len(), 2);

    let phone = products.iter().find(|p| p.id.as_str() == "p-phone").unwrap();
    assert_eq!(phone.name, "Aster Phone 12");
    assert_eq!(phone.price.minor(), 129_900);
    assert_eq!(phone.price.to_string(), "$1299.00");
    assert_eq!(phone.category, "Electronics");
    assert_eq!(phone.stock_status(), StockStatus::InStock);

    let shirt = products.iter().find(|p| p.id.as_str() == "p-shirt").unwrap();
    assert_eq!(shirt.stock_status(), StockStatus::OutOfStock);
    assert_eq!(shirt.sizes, vec!["s", "m", "l"]);
}

#[tokio::test]
async fn single_product_normalizes_from_object_metadata() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = api_client(&stub, &storage);

    // The detail endpoint answers with a bare object, not an array.
    let product = api.get_product(&ProductId::new("p-phone")).await.unwrap();
    assert_eq!(product.id.as_str(), "p-phone");
    assert_eq!(product.colors, vec!["black", "white"]);
    assert_eq!(
        product.attributes.manufacturer.as_deref(),
        Some("Aster")
    );
}

#[tokio::test]
async fn search_filters_by_category() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = api_client(&stub, &storage);

    let clothing = api.search_products("Clothing").await.unwrap();
    assert_eq!(clothing.len(), 1);
    assert_eq!(clothing.first().unwrap().id.as_str(), "p-shirt");

    let none = api.search_products("Furniture").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn missing_product_surfaces_server_message() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = api_client(&stub, &storage);

    let err = api.get_product(&ProductId::new("p-missing")).await.unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "product not found");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn anonymous_requests_carry_no_credentials() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = api_client(&stub, &storage);

    api.get_published_products().await.unwrap();

    let seen = stub.requests_for("/products/published");
    assert_eq!(seen.len(), 1);
    let request = seen.first().unwrap();
    assert!(request.authorization.is_none());
    assert!(request.client_id.is_none());
}

#[tokio::test]
async fn authenticated_requests_attach_token_and_client_id() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = api_client(&stub, &storage);

    // Sign in through the session store; the API client reads the persisted
    // credentials back out on its next request.
    let session = SessionStore::new(api.clone(), Arc::clone(&storage));
    session
        .login("owner@example.com", STUB_PASSWORD)
        .await
        .unwrap();

    api.get_published_products().await.unwrap();

    let seen = stub.requests_for("/products/published");
    let request = seen.first().unwrap();
    // The upstream contract: raw token, no "Bearer " prefix.
    assert_eq!(request.authorization.as_deref(), Some(STUB_ACCESS_TOKEN));
    assert_eq!(request.client_id.as_deref(), Some(STUB_CUSTOMER_ID));

    // After logout the same request goes out anonymously again.
    session.logout().await;
    api.search_products("Clothing").await.unwrap();
    let seen = stub.requests_for("/products/search/Clothing");
    assert!(seen.first().unwrap().authorization.is_none());
}

#[tokio::test]
async fn product_responses_are_cached() {
    let stub = StubApi::spawn().await;
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let api = api_client(&stub, &storage);

    let first = api.get_published_products().await.unwrap();
    let second = api.get_published_products().await.unwrap();
    assert_eq!(first, second);

    // The second read was served from cache.
    assert_eq!(stub.requests_for("/products/published").len(), 1);

    // Detail lookups cache independently per product.
    api.get_product(&ProductId::new("p-phone")).await.unwrap();
    api.get_product(&ProductId::new("p-phone")).await.unwrap();
    assert_eq!(stub.requests_for("/products/p-phone").len(), 1);
}

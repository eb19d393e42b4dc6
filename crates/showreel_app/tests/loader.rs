use httpmock::prelude::*;
use showreel_app::{CatalogLoader, CatalogSource, LoadError};
use showreel_core::{CatalogStore, Product};
use std::io::Write;

fn products_json() -> serde_json::Value {
    serde_json::json!({
        "products": [
            {"name": "Model S", "price": "$74,990", "image_url": "img/s.png", "meta": "Plaid | 2024"},
            {"name": "Model 3", "price": "$38,990", "image_url": "img/3.png"}
        ]
    })
}

#[tokio::test]
async fn test_http_fetch_with_cache_buster() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/products.json")
                .query_param_exists("v");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(products_json());
        })
        .await;

    let loader = CatalogLoader::from_location(&server.url("/products.json"));
    assert!(matches!(loader.source(), CatalogSource::Url(_)));

    let products = loader.fetch().await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Model S");
    assert_eq!(products[1].meta, None);
}

#[tokio::test]
async fn test_existing_query_keeps_its_parameters() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/products.json")
                .query_param("lang", "en")
                .query_param_exists("v");
            then.status(200).json_body(products_json());
        })
        .await;

    let loader = CatalogLoader::from_location(&server.url("/products.json?lang=en"));
    assert_eq!(loader.fetch().await.unwrap().len(), 2);
    api_mock.assert_async().await;
}

#[tokio::test]
async fn test_load_into_replaces_catalog() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products.json");
            then.status(200).json_body(products_json());
        })
        .await;

    let store = CatalogStore::with_products(vec![Product::new("Old", "$1", "old.png")]);
    let loader = CatalogLoader::from_location(&server.url("/products.json"));

    assert!(loader.load_into(&store).await);
    assert_eq!(store.len(), 2);
    assert_eq!(store.batch(1)[0].name, "Model 3");
}

#[tokio::test]
async fn test_failures_leave_catalog_untouched() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/missing.json");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/broken.json");
            then.status(200).body("<html>oops</html>");
        })
        .await;

    let store = CatalogStore::with_products(vec![Product::new("Kept", "$1", "k.png")]);

    let missing = CatalogLoader::from_location(&server.url("/missing.json"));
    assert!(matches!(
        missing.fetch().await,
        Err(LoadError::Status(status)) if status.as_u16() == 404
    ));
    assert!(!missing.load_into(&store).await);

    let broken = CatalogLoader::from_location(&server.url("/broken.json"));
    assert!(matches!(broken.fetch().await, Err(LoadError::Decode(_))));
    assert!(!broken.load_into(&store).await);

    assert_eq!(store.len(), 1);
    assert_eq!(store.batch(0)[0].name, "Kept");
}

#[tokio::test]
async fn test_null_products_is_empty_catalog() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/products.json");
            then.status(200).json_body(serde_json::json!({"products": null}));
        })
        .await;

    let store = CatalogStore::with_products(vec![Product::new("Old", "$1", "old.png")]);
    let loader = CatalogLoader::from_location(&server.url("/products.json"));

    assert!(loader.load_into(&store).await);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_file_sources() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(products_json().to_string().as_bytes()).unwrap();
    let path = file.path().display().to_string();

    let plain = CatalogLoader::from_location(&path);
    assert_eq!(plain.fetch().await.unwrap().len(), 2);

    let url = CatalogLoader::from_location(&format!("file://{path}"));
    assert_eq!(url.fetch().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");

    let loader = CatalogLoader::from_location(&path.display().to_string());
    assert!(matches!(loader.fetch().await, Err(LoadError::Io { .. })));
}

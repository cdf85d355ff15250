//! Integration tests for the backend HTTP client.
//!
//! Each test starts its own mock backend on an ephemeral port.

#![allow(clippy::indexing_slicing)]

use axum::http::StatusCode;
use fashionary_core::{DataUrl, ProductId, TryOnRequest, UserId};
use fashionary_integration_tests::{MockBackend, Reply, image_for};
use fashionary_storefront::backend::{
    BackendClient, BackendError, CatalogBackend, SortField, SortOrder,
};
use fashionary_storefront::config::BackendConfig;
use serde_json::json;

#[tokio::test]
async fn test_lists_products_and_displays() {
    let server = MockBackend::new()
        .product("prod1", "dress", 12, 49.99)
        .product("prod2", "shirt", 0, 19.5)
        .spawn()
        .await;
    let client = server.client();

    let products = client.list_products().await.expect("list products");
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].product_type, "dress");
    assert_eq!(products[0].display_price(), "$49.99");

    let display = client
        .product_display(&ProductId::new("prod2"))
        .await
        .expect("product display");
    assert_eq!(display.image, image_for("prod2"));
    assert_eq!(display.stock_status().label(), "Out of Stock");
    assert_eq!(server.display_hits(), 1);
}

#[tokio::test]
async fn test_sorted_listing_sends_query() {
    let server = MockBackend::new()
        .product("cheap", "shirt", 5, 10.0)
        .product("pricey", "dress", 5, 90.0)
        .spawn()
        .await;

    let products = server
        .client()
        .list_products_sorted(SortField::Price, SortOrder::Desc)
        .await
        .expect("sorted products");

    let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["pricey", "cheap"]);

    let query = server.product_queries().pop().expect("query recorded");
    assert_eq!(query.get("sort_by").map(String::as_str), Some("price"));
    assert_eq!(query.get("order").map(String::as_str), Some("desc"));
}

#[tokio::test]
async fn test_get_product_and_missing_product() {
    let server = MockBackend::new()
        .product("prod1", "dress", 3, 25.0)
        .spawn()
        .await;
    let client = server.client();

    let product = client
        .get_product(&ProductId::new("prod1"))
        .await
        .expect("get product");
    assert_eq!(product.stock, 3);

    let err = client
        .get_product(&ProductId::new("nope"))
        .await
        .expect_err("missing product");
    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "Not found");
}

#[tokio::test]
async fn test_users_and_ids() {
    let server = MockBackend::new()
        .user("user1", "User Alpha")
        .user("user2", "User Beta")
        .spawn()
        .await;
    let client = server.client();

    let users = client.list_users().await.expect("list users");
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].name, "User Beta");
    assert_eq!(users[0].style_preferences, vec!["casual", "minimal"]);

    let ids = client.all_user_ids().await.expect("all ids");
    assert_eq!(ids, vec![UserId::new("user1"), UserId::new("user2")]);

    let display = client
        .user_display(&UserId::new("user1"))
        .await
        .expect("user display");
    assert_eq!(display.user.name, "User Alpha");
    assert_eq!(display.image, image_for("user1"));
}

#[tokio::test]
async fn test_generate_try_on_posts_split_images() {
    let server = MockBackend::new()
        .try_on(Reply::ok(json!({
            "generated_image_base64": "data:image/jpeg;base64,new_generated_image_data",
            "mimetype": "image/jpeg"
        })))
        .spawn()
        .await;
    let request = TryOnRequest::new(
        DataUrl::parse(&image_for("user1")).expect("user image"),
        DataUrl::parse(&image_for("prod1")).expect("product image"),
    );

    let response = server
        .client()
        .generate_try_on(&request)
        .await
        .expect("generate");

    assert_eq!(
        response.image_src(),
        "data:image/jpeg;base64,new_generated_image_data"
    );
    assert_eq!(
        server.try_on_bodies(),
        vec![json!({
            "user_image_base64": "user1_base64data",
            "user_image_mimetype": "image/jpeg",
            "product_image_base64": "prod1_base64data",
            "product_image_mimetype": "image/jpeg"
        })]
    );
}

#[tokio::test]
async fn test_generated_image_bytes_survive_the_wire() {
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let server = MockBackend::new()
        .try_on_image("image/png", &png)
        .spawn()
        .await;
    let request = TryOnRequest::new(
        DataUrl::new("image/jpeg", "a"),
        DataUrl::new("image/jpeg", "b"),
    );

    let response = server
        .client()
        .generate_try_on(&request)
        .await
        .expect("generate");

    let image = DataUrl::parse(&response.image_src()).expect("data URL");
    assert_eq!(image.mime_type(), "image/png");
    assert_eq!(image.file_extension(), "png");
    assert_eq!(image.decode_bytes().expect("base64"), png);
}

#[tokio::test]
async fn test_error_detail_is_surfaced() {
    let server = MockBackend::new()
        .try_on(Reply::detail(StatusCode::INTERNAL_SERVER_ERROR, "boom"))
        .spawn()
        .await;
    let request = TryOnRequest::new(
        DataUrl::new("image/jpeg", "a"),
        DataUrl::new("image/png", "b"),
    );

    let err = server
        .client()
        .generate_try_on(&request)
        .await
        .expect_err("rejected");

    assert_eq!(
        err,
        BackendError::Status {
            status: 500,
            detail: Some("boom".to_string())
        }
    );
}

#[tokio::test]
async fn test_error_without_body_falls_back_to_status() {
    let server = MockBackend::new()
        .try_on(Reply::Empty(StatusCode::BAD_GATEWAY))
        .spawn()
        .await;
    let request = TryOnRequest::new(
        DataUrl::new("image/jpeg", "a"),
        DataUrl::new("image/jpeg", "b"),
    );

    let err = server
        .client()
        .generate_try_on(&request)
        .await
        .expect_err("rejected");

    assert_eq!(
        err,
        BackendError::Status {
            status: 502,
            detail: None
        }
    );
    assert_eq!(err.user_message(), "request failed with status 502");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = MockBackend::new()
        .product("prod1", "dress", 1, 5.0)
        .product_display("prod1", Reply::ok(json!({ "unexpected": true })))
        .spawn()
        .await;

    let err = server
        .client()
        .product_display(&ProductId::new("prod1"))
        .await
        .expect_err("decode failure");

    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind and drop a listener to get a port nothing is serving on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let config = BackendConfig::new(&format!("http://{addr}")).expect("config");
    let client = BackendClient::new(&config).expect("client");

    let err = client.list_users().await.expect_err("unreachable");

    assert!(matches!(err, BackendError::Transport(_)));
    assert!(err.user_message().starts_with("could not reach the server"));
}

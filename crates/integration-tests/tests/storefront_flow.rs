//! End-to-end tests for the try-on page.
//!
//! The page runs against a mock backend through the real HTTP client; the
//! rendered-HTML tests additionally serve the storefront router and drive it
//! with `reqwest` the way HTMX would.

#![allow(clippy::indexing_slicing)]

use axum::http::StatusCode;
use fashionary_core::{ProductId, UserId};
use fashionary_integration_tests::{MockBackend, MockServer, Reply, spawn_storefront};
use fashionary_storefront::config::DisplayFailurePolicy;
use fashionary_storefront::page::catalog::{PRODUCTS_ERROR, USERS_ERROR};
use fashionary_storefront::page::try_on::{FailureKind, TryOnState};
use serde_json::json;

const FORM: &str = "application/x-www-form-urlencoded";
const GENERATED: &str = "data:image/jpeg;base64,new_generated_image_data";

async fn catalog_backend() -> MockServer {
    MockBackend::new()
        .product("prod1", "dress", 12, 49.99)
        .product("prod2", "shirt", 4, 19.5)
        .product("prod3", "Shirt", 0, 24.0)
        .user("user1", "User Alpha")
        .user("user2", "User Beta")
        .try_on(Reply::ok(json!({
            "generated_image_base64": GENERATED,
            "mimetype": "image/jpeg"
        })))
        .spawn()
        .await
}

#[tokio::test]
async fn test_catalog_issues_one_display_fetch_per_product() {
    let server = catalog_backend().await;
    let page = server.storefront(DisplayFailurePolicy::Abort);

    page.load_catalog().await;

    let snapshot = page.snapshot();
    assert_eq!(server.display_hits(), 3);
    assert_eq!(snapshot.products.items().len(), 3);
    assert_eq!(snapshot.users.items().len(), 2);
    assert_eq!(snapshot.categories(), vec!["all", "dress", "shirt"]);
}

#[tokio::test]
async fn test_display_failure_policies() {
    let backend = || {
        MockBackend::new()
            .product("prod1", "dress", 1, 5.0)
            .product("prod2", "shirt", 1, 6.0)
            .product_display("prod2", Reply::Empty(StatusCode::INTERNAL_SERVER_ERROR))
            .user("user1", "User Alpha")
    };

    let server = backend().spawn().await;
    let page = server.storefront(DisplayFailurePolicy::Abort);
    page.load_catalog().await;
    let snapshot = page.snapshot();
    assert_eq!(snapshot.products.error(), Some(PRODUCTS_ERROR));
    // The user branch is unaffected by the product failure.
    assert_eq!(snapshot.users.items().len(), 1);

    let server = backend().spawn().await;
    let page = server.storefront(DisplayFailurePolicy::Skip);
    page.load_catalog().await;
    let ids: Vec<_> = page
        .snapshot()
        .products
        .items()
        .iter()
        .map(|p| p.id.to_string())
        .collect();
    assert_eq!(ids, vec!["prod1"]);
}

#[tokio::test]
async fn test_empty_catalog_is_not_an_error() {
    let server = MockBackend::new().spawn().await;
    let page = server.storefront(DisplayFailurePolicy::Abort);

    page.load_catalog().await;

    let snapshot = page.snapshot();
    assert!(snapshot.products.is_empty());
    assert!(snapshot.users.is_empty());
    assert!(snapshot.products.error().is_none());
    assert_eq!(server.display_hits(), 0);
}

#[tokio::test]
async fn test_list_failures_set_branch_errors() {
    let server = MockBackend::new()
        .failing_lists(Reply::Empty(StatusCode::SERVICE_UNAVAILABLE))
        .spawn()
        .await;
    let page = server.storefront(DisplayFailurePolicy::Abort);

    page.load_catalog().await;

    let snapshot = page.snapshot();
    assert_eq!(snapshot.products.error(), Some(PRODUCTS_ERROR));
    assert_eq!(snapshot.users.error(), Some(USERS_ERROR));
}

#[tokio::test]
async fn test_generate_keeps_exact_image_src() {
    let server = catalog_backend().await;
    let page = server.storefront(DisplayFailurePolicy::Abort);
    page.load_catalog().await;

    page.select_user(Some(UserId::new("user1"))).await;
    page.select_product(Some(&ProductId::new("prod1")));
    assert!(page.snapshot().can_generate());

    let state = page.generate().await;

    assert_eq!(state.image_src(), Some(GENERATED));
    assert_eq!(page.snapshot().try_on, state);
    let bodies = server.try_on_bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["user_image_base64"], "user1_base64data");
    assert_eq!(bodies[0]["product_image_base64"], "prod1_base64data");
}

#[tokio::test]
async fn test_generate_failure_surfaces_detail() {
    let server = MockBackend::new()
        .product("prod1", "dress", 1, 5.0)
        .user("user1", "User Alpha")
        .try_on(Reply::detail(StatusCode::INTERNAL_SERVER_ERROR, "boom"))
        .spawn()
        .await;
    let page = server.storefront(DisplayFailurePolicy::Abort);
    page.load_catalog().await;
    page.select_user(Some(UserId::new("user1"))).await;
    page.select_product(Some(&ProductId::new("prod1")));

    let state = page.generate().await;

    let failure = state.failure().expect("failed state");
    assert_eq!(failure.kind, FailureKind::Rejected);
    assert_eq!(failure.message, "boom");
    assert!(state.image_src().is_none());
}

#[tokio::test]
async fn test_generate_failure_without_body_uses_status() {
    let server = MockBackend::new()
        .product("prod1", "dress", 1, 5.0)
        .user("user1", "User Alpha")
        .try_on(Reply::Empty(StatusCode::BAD_GATEWAY))
        .spawn()
        .await;
    let page = server.storefront(DisplayFailurePolicy::Abort);
    page.load_catalog().await;
    page.select_user(Some(UserId::new("user1"))).await;
    page.select_product(Some(&ProductId::new("prod1")));

    let state = page.generate().await;

    assert_eq!(
        state.failure().map(|f| f.message.as_str()),
        Some("Try-on generation failed with status 502")
    );
}

#[tokio::test]
async fn test_failed_user_display_blocks_generation() {
    let server = MockBackend::new()
        .product("prod1", "dress", 1, 5.0)
        .user("user1", "User Alpha")
        .user_display("user1", Reply::detail(StatusCode::NOT_FOUND, "User not found"))
        .spawn()
        .await;
    let page = server.storefront(DisplayFailurePolicy::Abort);
    page.load_catalog().await;

    page.select_user(Some(UserId::new("user1"))).await;
    page.select_product(Some(&ProductId::new("prod1")));

    let snapshot = page.snapshot();
    assert!(snapshot.selected_user.error().is_some_and(|e| e.contains("User not found")));
    assert!(!snapshot.can_generate());

    let state = page.generate().await;
    assert_eq!(state.failure().map(|f| f.kind), Some(FailureKind::Validation));
    assert!(server.try_on_bodies().is_empty());
}

#[tokio::test]
async fn test_rendered_page_flow() {
    let server = catalog_backend().await;
    let page = server.storefront(DisplayFailurePolicy::Abort);
    page.load_catalog().await;
    let (base_url, _state) = spawn_storefront(page).await;
    let http = reqwest::Client::new();

    let home = http
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("GET /");
    assert_eq!(home.status(), StatusCode::OK);
    let html = home.text().await.expect("body");
    assert!(html.contains("Product prod1"));
    assert!(html.contains("User Beta"));
    assert!(html.contains("Select a model and a product, then click"));

    let model = http
        .post(format!("{base_url}/select/user"))
        .header("HX-Request", "true")
        .header("Content-Type", FORM)
        .body("user_id=user2")
        .send()
        .await
        .expect("POST /select/user");
    assert_eq!(model.status(), StatusCode::OK);
    assert!(model.text().await.expect("body").contains("Description for User Beta"));

    http.post(format!("{base_url}/select/product"))
        .header("HX-Request", "true")
        .header("Content-Type", FORM)
        .body("product_id=prod2")
        .send()
        .await
        .expect("POST /select/product");

    let try_on = http
        .post(format!("{base_url}/try-on"))
        .header("HX-Request", "true")
        .send()
        .await
        .expect("POST /try-on");
    assert_eq!(
        try_on.headers().get("HX-Trigger").map(|v| v.as_bytes()),
        Some(&b"try-on-complete"[..])
    );
    let html = try_on.text().await.expect("body");
    assert!(html.contains(&format!(r#"src="{GENERATED}""#)));
    assert!(!html.contains("Error:"));
}

#[tokio::test]
async fn test_rendered_profiles() {
    let server = catalog_backend().await;
    let (base_url, _state) = spawn_storefront(server.storefront(DisplayFailurePolicy::Abort)).await;
    let http = reqwest::Client::new();

    let index = http
        .get(format!("{base_url}/users"))
        .send()
        .await
        .expect("GET /users")
        .text()
        .await
        .expect("body");
    assert!(index.contains(r#"href="/users/user1""#));

    let profile = http
        .get(format!("{base_url}/users/user2"))
        .send()
        .await
        .expect("GET /users/user2");
    assert_eq!(profile.status(), StatusCode::OK);
    let html = profile.text().await.expect("body");
    assert!(html.contains("User Beta"));
    assert!(html.contains("minimal"));

    let missing = http
        .get(format!("{base_url}/users/ghost"))
        .send()
        .await
        .expect("GET /users/ghost");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_try_on_state_starts_idle() {
    let server = MockBackend::new().spawn().await;
    let page = server.storefront(DisplayFailurePolicy::Abort);

    assert_eq!(page.snapshot().try_on, TryOnState::Idle);
    assert!(!page.snapshot().can_generate());
}

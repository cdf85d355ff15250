//! Integration tests for Fashionary.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p fashionary-integration-tests
//! ```
//!
//! No external services are needed: [`MockBackend`] serves the catalog and
//! try-on API from an Axum router bound to an ephemeral local port, and the
//! real [`BackendClient`] talks to it over HTTP.
//!
//! # Test Categories
//!
//! - `backend_client` - Wire behavior of the HTTP client
//! - `storefront_flow` - Page orchestration and rendered HTML end to end

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use fashionary_core::DataUrl;
use fashionary_storefront::backend::BackendClient;
use fashionary_storefront::config::{BackendConfig, DisplayFailurePolicy};
use fashionary_storefront::page::Storefront;
use fashionary_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// A canned backend response.
#[derive(Debug, Clone)]
pub enum Reply {
    /// JSON body with a status.
    Json(StatusCode, Value),
    /// Status with an empty body.
    Empty(StatusCode),
}

impl Reply {
    /// `{ "detail": message }` with the given status.
    #[must_use]
    pub fn detail(status: StatusCode, message: &str) -> Self {
        Self::Json(status, json!({ "detail": message }))
    }

    /// Successful JSON body.
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self::Json(StatusCode::OK, body)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Self::Json(status, body) => (status, Json(body)).into_response(),
            Self::Empty(status) => status.into_response(),
        }
    }
}

/// Inline image used for every fixture record.
#[must_use]
pub fn image_for(id: &str) -> String {
    format!("data:image/jpeg;base64,{id}_base64data")
}

/// Scriptable catalog and try-on backend.
#[derive(Debug, Default)]
pub struct MockBackend {
    products: Vec<Value>,
    product_displays: HashMap<String, Reply>,
    users: Vec<Value>,
    user_displays: HashMap<String, Reply>,
    try_on: Option<Reply>,
    list_failure: Option<Reply>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with a matching display record.
    #[must_use]
    pub fn product(mut self, id: &str, product_type: &str, stock: i64, price: f64) -> Self {
        let summary = json!({
            "id": id,
            "image_path": format!("images/{id}.jpg"),
            "description": format!("Product {id}"),
            "type": product_type,
            "color": "black",
            "stock": stock,
            "price": price,
            "created_at": "2024-05-01T10:00:00"
        });
        let mut display = summary.clone();
        display["image"] = json!(image_for(id));
        display["price"] = json!(format!("${price:.2}"));
        display["stock_status"] = json!(if stock == 0 { "Out of Stock" } else { "In Stock" });

        self.products.push(summary);
        self.product_displays
            .insert(id.to_string(), Reply::ok(display));
        self
    }

    /// Replace a product's display response.
    #[must_use]
    pub fn product_display(mut self, id: &str, reply: Reply) -> Self {
        self.product_displays.insert(id.to_string(), reply);
        self
    }

    /// Add a user with a matching display record.
    #[must_use]
    pub fn user(mut self, id: &str, name: &str) -> Self {
        let summary = json!({
            "id": id,
            "name": name,
            "description": format!("Description for {name}"),
            "style_preferences": ["casual", "minimal"],
            "purchase_history": [],
            "cart_status": { "items": [], "total_price": 0.0 }
        });
        let mut display = summary.clone();
        display["image"] = json!(image_for(id));

        self.users.push(summary);
        self.user_displays.insert(id.to_string(), Reply::ok(display));
        self
    }

    /// Replace a user's display response.
    #[must_use]
    pub fn user_display(mut self, id: &str, reply: Reply) -> Self {
        self.user_displays.insert(id.to_string(), reply);
        self
    }

    /// Set the try-on generation response.
    #[must_use]
    pub fn try_on(mut self, reply: Reply) -> Self {
        self.try_on = Some(reply);
        self
    }

    /// Answer try-on requests with `bytes` encoded as a data URL.
    #[must_use]
    pub fn try_on_image(self, mime_type: &str, bytes: &[u8]) -> Self {
        let image = DataUrl::from_bytes(mime_type, bytes);
        self.try_on(Reply::ok(json!({
            "generated_image_base64": image.to_string(),
            "mimetype": mime_type
        })))
    }

    /// Make both list endpoints fail with `reply`.
    #[must_use]
    pub fn failing_lists(mut self, reply: Reply) -> Self {
        self.list_failure = Some(reply);
        self
    }

    /// Serve the backend on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(self) -> MockServer {
        let state = Arc::new(MockState {
            backend: self,
            display_hits: AtomicUsize::new(0),
            product_queries: Mutex::default(),
            try_on_bodies: Mutex::default(),
        });

        let app = Router::new()
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .route("/products/{id}/display", get(product_display))
            .route("/users", get(list_users))
            .route("/users/all_ids", get(all_user_ids))
            .route("/users/{id}/display", get(user_display))
            .route("/api/v1/tryon/generate", post(generate))
            .with_state(Arc::clone(&state));

        let base_url = serve(app).await;
        MockServer { base_url, state }
    }
}

/// Handle to a running [`MockBackend`].
pub struct MockServer {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockServer {
    /// Client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected.
    #[must_use]
    pub fn config(&self) -> BackendConfig {
        BackendConfig::new(&self.base_url).expect("mock base URL is valid")
    }

    /// A real HTTP client pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> BackendClient {
        BackendClient::new(&self.config()).expect("Failed to build backend client")
    }

    /// A try-on page backed by this server.
    #[must_use]
    pub fn storefront(&self, policy: DisplayFailurePolicy) -> Storefront<BackendClient> {
        Storefront::new(self.client(), policy)
    }

    /// Number of product display requests served.
    #[must_use]
    pub fn display_hits(&self) -> usize {
        self.state.display_hits.load(Ordering::SeqCst)
    }

    /// Query strings received by `GET /products`.
    #[must_use]
    pub fn product_queries(&self) -> Vec<HashMap<String, String>> {
        lock(&self.state.product_queries).clone()
    }

    /// Bodies received by the generate endpoint.
    #[must_use]
    pub fn try_on_bodies(&self) -> Vec<Value> {
        lock(&self.state.try_on_bodies).clone()
    }
}

/// Serve the storefront app for `page` on an ephemeral local port and
/// return its base URL.
pub async fn spawn_storefront(page: Storefront<BackendClient>) -> (String, AppState) {
    let state = AppState::new(page);
    let base_url = serve(fashionary_storefront::app(state.clone())).await;
    (base_url, state)
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server failed");
    });
    format!("http://{addr}")
}

#[derive(Debug)]
struct MockState {
    backend: MockBackend,
    display_hits: AtomicUsize,
    product_queries: Mutex<Vec<HashMap<String, String>>>,
    try_on_bodies: Mutex<Vec<Value>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found() -> Reply {
    Reply::detail(StatusCode::NOT_FOUND, "Not found")
}

async fn list_products(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    lock(&state.product_queries).push(query.clone());
    if let Some(failure) = &state.backend.list_failure {
        return failure.clone();
    }

    let mut products = state.backend.products.clone();
    if let Some(field) = query.get("sort_by") {
        products.sort_by(|a, b| {
            let (a, b) = (&a[field.as_str()], &b[field.as_str()]);
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => a.to_string().cmp(&b.to_string()),
            }
        });
        if query.get("order").is_some_and(|order| order == "desc") {
            products.reverse();
        }
    }
    Reply::ok(Value::Array(products))
}

async fn get_product(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Reply {
    state
        .backend
        .products
        .iter()
        .find(|p| p["id"] == id.as_str())
        .map_or_else(not_found, |p| Reply::ok(p.clone()))
}

async fn product_display(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Reply {
    state.display_hits.fetch_add(1, Ordering::SeqCst);
    state
        .backend
        .product_displays
        .get(&id)
        .cloned()
        .unwrap_or_else(not_found)
}

async fn list_users(State(state): State<Arc<MockState>>) -> Reply {
    if let Some(failure) = &state.backend.list_failure {
        return failure.clone();
    }
    Reply::ok(Value::Array(state.backend.users.clone()))
}

async fn all_user_ids(State(state): State<Arc<MockState>>) -> Reply {
    let ids: Vec<Value> = state
        .backend
        .users
        .iter()
        .map(|u| u["id"].clone())
        .collect();
    Reply::ok(Value::Array(ids))
}

async fn user_display(State(state): State<Arc<MockState>>, Path(id): Path<String>) -> Reply {
    state
        .backend
        .user_displays
        .get(&id)
        .cloned()
        .unwrap_or_else(not_found)
}

async fn generate(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    lock(&state.try_on_bodies).push(body);
    state
        .backend
        .try_on
        .clone()
        .unwrap_or_else(|| Reply::detail(StatusCode::INTERNAL_SERVER_ERROR, "not configured"))
}

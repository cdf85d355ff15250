//! In-memory backend for orchestration and route tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use fashionary_core::{
    Product, ProductDisplay, ProductId, TryOnRequest, TryOnResponse, User, UserDisplay, UserId,
};
use serde_json::json;
use tokio::sync::{Notify, Semaphore};

use crate::backend::{BackendError, CatalogBackend, SortField, SortOrder};

/// Scriptable [`CatalogBackend`].
///
/// Call counters are bumped when a method is called, not when its future is
/// first polled, so they count issued requests.
#[derive(Default)]
pub struct FakeBackend {
    products: Vec<(Product, Result<ProductDisplay, BackendError>)>,
    users: Vec<User>,
    user_displays: HashMap<String, Result<UserDisplay, BackendError>>,
    user_gates: HashMap<String, Arc<Notify>>,
    try_on: Option<Result<TryOnResponse, BackendError>>,
    try_on_gate: Option<Arc<Notify>>,
    fail_lists: bool,
    product_list_gate: Mutex<Option<Arc<Semaphore>>>,
    user_list_gate: Mutex<Option<Arc<Semaphore>>>,
    list_calls: AtomicUsize,
    product_display_calls: AtomicUsize,
    user_display_calls: AtomicUsize,
    try_on_requests: Mutex<Vec<TryOnRequest>>,
}

impl FakeBackend {
    pub fn server_error() -> BackendError {
        BackendError::Status {
            status: 500,
            detail: None,
        }
    }

    fn not_found() -> BackendError {
        BackendError::Status {
            status: 404,
            detail: Some("Not found".to_string()),
        }
    }

    pub fn with_product(
        mut self,
        summary: Product,
        display: Result<ProductDisplay, BackendError>,
    ) -> Self {
        self.products.push((summary, display));
        self
    }

    pub fn with_user(mut self, user: UserDisplay) -> Self {
        self.users.push(user.user.clone());
        self.user_displays
            .insert(user.user.id.to_string(), Ok(user));
        self
    }

    pub fn with_user_display_result(
        mut self,
        id: &str,
        result: Result<UserDisplay, BackendError>,
    ) -> Self {
        self.user_displays.insert(id.to_string(), result);
        self
    }

    /// Hold the display response for `id` until the returned gate is notified.
    pub fn gate_user(&mut self, id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.user_gates.insert(id.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn with_try_on(mut self, result: Result<TryOnResponse, BackendError>) -> Self {
        self.try_on = Some(result);
        self
    }

    /// Hold try-on responses until the returned gate is notified.
    pub fn gate_try_on(&mut self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.try_on_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Hold the next `list_products` and `list_users` calls until the
    /// returned semaphore gets one permit per call, then fail them.
    pub fn gate_next_lists(&mut self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.product_list_gate = Mutex::new(Some(Arc::clone(&gate)));
        self.user_list_gate = Mutex::new(Some(Arc::clone(&gate)));
        gate
    }

    pub const fn failing_lists(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn product_display_calls(&self) -> usize {
        self.product_display_calls.load(Ordering::SeqCst)
    }

    pub fn user_display_calls(&self) -> usize {
        self.user_display_calls.load(Ordering::SeqCst)
    }

    pub fn try_on_requests(&self) -> Vec<TryOnRequest> {
        self.try_on_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn take_gate(gate: &Mutex<Option<Arc<Semaphore>>>) -> Option<Arc<Semaphore>> {
    gate.lock().unwrap_or_else(PoisonError::into_inner).take()
}

async fn hold(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        if let Ok(permit) = gate.acquire().await {
            permit.forget();
        }
    }
}

impl CatalogBackend for FakeBackend {
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, BackendError>> + Send {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = take_gate(&self.product_list_gate);
        let result = if self.fail_lists || gate.is_some() {
            Err(Self::server_error())
        } else {
            Ok(self.products.iter().map(|(p, _)| p.clone()).collect())
        };
        async move {
            hold(gate).await;
            result
        }
    }

    fn list_products_sorted(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> impl Future<Output = Result<Vec<Product>, BackendError>> + Send {
        let mut products: Vec<Product> = self.products.iter().map(|(p, _)| p.clone()).collect();
        products.sort_by(|a, b| match field {
            SortField::Stock => a.stock.cmp(&b.stock),
            SortField::Price => a.price.cmp(&b.price),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        });
        if order == SortOrder::Desc {
            products.reverse();
        }
        async move { Ok(products) }
    }

    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, BackendError>> + Send {
        let result = self
            .products
            .iter()
            .find(|(p, _)| &p.id == id)
            .map(|(p, _)| p.clone())
            .ok_or_else(Self::not_found);
        async move { result }
    }

    fn product_display(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<ProductDisplay, BackendError>> + Send {
        self.product_display_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .products
            .iter()
            .find(|(p, _)| &p.id == id)
            .map_or_else(|| Err(Self::not_found()), |(_, d)| d.clone());
        async move { result }
    }

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, BackendError>> + Send {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = take_gate(&self.user_list_gate);
        let result = if self.fail_lists || gate.is_some() {
            Err(Self::server_error())
        } else {
            Ok(self.users.clone())
        };
        async move {
            hold(gate).await;
            result
        }
    }

    fn user_display(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<UserDisplay, BackendError>> + Send {
        self.user_display_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .user_displays
            .get(id.as_str())
            .cloned()
            .unwrap_or_else(|| Err(Self::not_found()));
        let gate = self.user_gates.get(id.as_str()).cloned();
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            result
        }
    }

    fn all_user_ids(&self) -> impl Future<Output = Result<Vec<UserId>, BackendError>> + Send {
        let ids = self.users.iter().map(|u| u.id.clone()).collect();
        async move { Ok(ids) }
    }

    fn generate_try_on(
        &self,
        request: &TryOnRequest,
    ) -> impl Future<Output = Result<TryOnResponse, BackendError>> + Send {
        self.try_on_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let result = self
            .try_on
            .clone()
            .unwrap_or_else(|| Err(Self::server_error()));
        let gate = self.try_on_gate.clone();
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            result
        }
    }
}

#[allow(clippy::unwrap_used)]
pub fn summary(id: &str, product_type: &str) -> Product {
    serde_json::from_value(json!({
        "id": id,
        "image_path": format!("images/{id}.jpg"),
        "description": format!("Product {id}"),
        "type": product_type,
        "stock": 12,
        "price": 10.0
    }))
    .unwrap()
}

#[allow(clippy::unwrap_used)]
pub fn display(id: &str, product_type: &str) -> ProductDisplay {
    serde_json::from_value(json!({
        "id": id,
        "image": format!("data:image/jpeg;base64,{id}_base64data"),
        "description": format!("Product {id}"),
        "type": product_type,
        "stock": 12,
        "price": "$10.00",
        "stock_status": "In Stock"
    }))
    .unwrap()
}

#[allow(clippy::unwrap_used)]
pub fn user_display(id: &str, name: &str) -> UserDisplay {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "description": format!("Description for {name}"),
        "style_preferences": ["casual"],
        "purchase_history": [],
        "image": format!("data:image/jpeg;base64,{id}_base64data")
    }))
    .unwrap()
}

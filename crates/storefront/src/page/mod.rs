//! Try-on page orchestration.
//!
//! # Flow
//!
//! 1. [`Storefront::load_catalog`] fetches products (plus display records) and
//!    users as two independent branches
//! 2. [`Storefront::select_user`] fetches the chosen model's display record;
//!    [`Storefront::select_product`] picks from the loaded catalog
//! 3. [`Storefront::generate`] validates both selections, posts the try-on
//!    request and swaps the result into the page
//!
//! # Concurrency
//!
//! Page state sits behind a mutex that is never held across an await.
//! Every slot that can have a request in flight (catalog, selected user,
//! try-on) tags its requests with a [`sequence::Ticket`]; a response whose
//! ticket has been superseded is dropped instead of overwriting newer state.

pub mod catalog;
pub mod selection;
pub mod sequence;
pub mod try_on;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Mutex, MutexGuard, PoisonError};

use fashionary_core::{ProductDisplay, ProductId, User, UserId};
use tracing::{debug, info, instrument};

use crate::backend::CatalogBackend;
use crate::config::DisplayFailurePolicy;
use catalog::Branch;
use selection::{SelectedUser, USER_DISPLAY_ERROR};
use sequence::{Sequencer, Ticket};
use try_on::TryOnState;

/// Read-only copy of the page used for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSnapshot {
    pub products: Branch<ProductDisplay>,
    pub users: Branch<User>,
    pub selected_user: SelectedUser,
    pub selected_product: Option<ProductDisplay>,
    pub product_error: Option<String>,
    pub try_on: TryOnState,
}

impl PageSnapshot {
    /// Whether the generate trigger is enabled.
    #[must_use]
    pub const fn can_generate(&self) -> bool {
        try_on::can_generate(
            self.selected_user.loaded().is_some(),
            self.selected_product.is_some(),
            self.try_on.is_requesting(),
        )
    }

    /// Category filter options for the loaded catalog.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        catalog::categories(self.products.items())
    }
}

#[derive(Default)]
struct PageState {
    page: PageSnapshot,
    catalog_seq: Sequencer,
    user_seq: Sequencer,
    try_on_seq: Sequencer,
}

impl PageState {
    /// Drop any in-flight try-on result; it was generated for old selections.
    fn supersede_try_on(&mut self) {
        if self.page.try_on.is_requesting() {
            self.try_on_seq.issue();
            self.page.try_on = TryOnState::Idle;
            debug!("Selection changed; in-flight try-on superseded");
        }
    }
}

/// Page state plus the backend it is loaded from.
pub struct Storefront<B> {
    backend: B,
    policy: DisplayFailurePolicy,
    state: Mutex<PageState>,
}

impl<B: CatalogBackend> Storefront<B> {
    /// Create a page in its initial state: both catalog branches loading,
    /// nothing selected, try-on idle.
    #[must_use]
    pub fn new(backend: B, policy: DisplayFailurePolicy) -> Self {
        Self {
            backend,
            policy,
            state: Mutex::new(PageState::default()),
        }
    }

    /// The backend the page loads from.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy the current page for rendering.
    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        self.state().page.clone()
    }

    /// Run the catalog loader.
    ///
    /// Each branch is written as soon as it finishes, so products can render
    /// while users are still loading and the other way around.
    #[instrument(skip(self))]
    pub async fn load_catalog(&self) {
        let ticket = {
            let mut state = self.state();
            state.page.products = Branch::Loading;
            state.page.users = Branch::Loading;
            state.catalog_seq.issue()
        };

        let products = async {
            let branch = catalog::load_products(&self.backend, self.policy).await;
            self.apply_catalog(ticket, |page| page.products = branch);
        };
        let users = async {
            let branch = catalog::load_users(&self.backend).await;
            self.apply_catalog(ticket, |page| page.users = branch);
        };
        tokio::join!(products, users);
    }

    fn apply_catalog(&self, ticket: Ticket, apply: impl FnOnce(&mut PageSnapshot)) {
        let mut state = self.state();
        if state.catalog_seq.is_current(ticket) {
            apply(&mut state.page);
        } else {
            debug!("Discarding stale catalog response");
        }
    }

    /// Select a model by id and load its display record.
    ///
    /// `None` or a blank id clears the selection without a request. Only the
    /// most recent selection's response is applied.
    #[instrument(skip(self), fields(user_id = ?id.as_ref().map(UserId::as_str)))]
    pub async fn select_user(&self, id: Option<UserId>) {
        let id = id.filter(|id| !id.is_blank());

        let (ticket, id) = {
            let mut state = self.state();
            let ticket = state.user_seq.issue();
            state.supersede_try_on();
            let Some(id) = id else {
                state.page.selected_user = SelectedUser::None;
                return;
            };
            state.page.selected_user = SelectedUser::Loading(id.clone());
            (ticket, id)
        };

        let result = self.backend.user_display(&id).await;

        let mut state = self.state();
        if !state.user_seq.is_current(ticket) {
            debug!("Discarding stale user display response");
            return;
        }
        state.page.selected_user = match result {
            Ok(display) => {
                info!("Selected model loaded");
                SelectedUser::Loaded(display)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load selected model");
                SelectedUser::Failed {
                    message: format!("{USER_DISPLAY_ERROR}: {}", e.user_message()),
                    id,
                }
            }
        };
    }

    /// Select a product from the loaded catalog.
    ///
    /// `None` clears the selection. An id that is not in the catalog clears
    /// the selection and records a product error.
    #[instrument(skip(self), fields(product_id = ?id.map(ProductId::as_str)))]
    pub fn select_product(&self, id: Option<&ProductId>) {
        let mut state = self.state();
        state.supersede_try_on();

        let id = id.filter(|id| !id.is_blank());
        let Some(id) = id else {
            state.page.selected_product = None;
            state.page.product_error = None;
            return;
        };

        let found = state
            .page
            .products
            .items()
            .iter()
            .find(|p| &p.id == id)
            .cloned();

        if found.is_none() {
            tracing::warn!("Selected product is not in the catalog");
            state.page.product_error = Some(format!("Product {id} is not in the catalog"));
        } else {
            state.page.product_error = None;
        }
        state.page.selected_product = found;
    }

    /// Activate the generate trigger.
    ///
    /// Returns the resulting panel state. Does nothing while a request is
    /// already in flight; the trigger is disabled then.
    #[instrument(skip(self))]
    pub async fn generate(&self) -> TryOnState {
        let (ticket, request) = {
            let mut state = self.state();
            if state.page.try_on.is_requesting() {
                debug!("Generate ignored; request already in flight");
                return state.page.try_on.clone();
            }

            state.page.try_on = TryOnState::Validating;
            let built = try_on::build_request(
                state.page.selected_user.loaded(),
                state.page.selected_product.as_ref(),
            );
            match built {
                Ok(request) => {
                    state.page.try_on = TryOnState::Requesting;
                    (state.try_on_seq.issue(), request)
                }
                Err(failure) => {
                    failure.log();
                    state.page.try_on = TryOnState::Failed(failure);
                    return state.page.try_on.clone();
                }
            }
        };

        let outcome = self.backend.generate_try_on(&request).await;

        let mut state = self.state();
        if !state.try_on_seq.is_current(ticket) {
            debug!("Discarding stale try-on response");
            return state.page.try_on.clone();
        }
        let next = TryOnState::from_outcome(outcome);
        match &next {
            TryOnState::Failed(failure) => failure.log(),
            _ => info!("Try-on image generated"),
        }
        state.page.try_on = next;
        state.page.try_on.clone()
    }
}

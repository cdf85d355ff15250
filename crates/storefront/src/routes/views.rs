//! Template view models built from a [`PageSnapshot`].

use fashionary_core::{ProductDisplay, User, UserDisplay, format_price};

use crate::page::PageSnapshot;
use crate::page::catalog;
use crate::page::selection::SelectedUser;

/// Product card display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub image: String,
    pub description: String,
    pub product_type: String,
    pub color: String,
    pub graphic: String,
    pub variant: String,
    pub price: String,
    pub stock_status: String,
    pub badge: &'static str,
    pub selected: bool,
}

impl ProductCardView {
    fn new(product: &ProductDisplay, selected: bool) -> Self {
        let status = product.stock_status();
        Self {
            id: product.id.to_string(),
            image: product.image.clone(),
            description: product.description.clone(),
            product_type: product.product_type.clone(),
            color: product.color.clone(),
            graphic: product.graphic.clone(),
            variant: product.variant.clone(),
            price: product.price.clone(),
            stock_status: status.label().to_string(),
            badge: status.badge(),
            selected,
        }
    }
}

/// Category filter button.
#[derive(Clone)]
pub struct CategoryView {
    pub key: String,
    pub active: bool,
}

/// Catalog grid display data.
#[derive(Clone)]
pub struct CatalogView {
    pub loading: bool,
    pub error: Option<String>,
    /// Loaded, but nothing to show for the active category.
    pub empty: bool,
    /// Active category filter, carried through product selection.
    pub category: String,
    pub categories: Vec<CategoryView>,
    pub products: Vec<ProductCardView>,
    pub selected: Option<ProductCardView>,
    pub selection_error: Option<String>,
}

impl CatalogView {
    /// Build the grid for one request's category filter.
    ///
    /// The filter is request input only; it is never stored on the page.
    #[must_use]
    pub fn new(page: &PageSnapshot, category: Option<&str>) -> Self {
        let category = catalog::resolve_category(page.products.items(), category);
        let selected_id = page.selected_product.as_ref().map(|p| &p.id);
        let products: Vec<ProductCardView> =
            catalog::filter_by_category(page.products.items(), &category)
                .into_iter()
                .map(|p| ProductCardView::new(p, selected_id == Some(&p.id)))
                .collect();

        Self {
            loading: page.products.is_loading(),
            error: page.products.error().map(String::from),
            empty: !page.products.is_loading()
                && page.products.error().is_none()
                && products.is_empty(),
            categories: page
                .categories()
                .into_iter()
                .map(|key| CategoryView {
                    active: key == category,
                    key,
                })
                .collect(),
            category,
            products,
            selected: page
                .selected_product
                .as_ref()
                .map(|p| ProductCardView::new(p, true)),
            selection_error: page.product_error.clone(),
        }
    }
}

/// Model picker option.
#[derive(Clone)]
pub struct UserOptionView {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Selected model card.
#[derive(Clone)]
pub struct SelectedModelView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub style_preferences: Vec<String>,
}

impl From<&UserDisplay> for SelectedModelView {
    fn from(display: &UserDisplay) -> Self {
        Self {
            id: display.user.id.to_string(),
            name: display.user.name.clone(),
            description: display.user.description.clone().unwrap_or_default(),
            image: display.image.clone(),
            style_preferences: display.user.style_preferences.clone(),
        }
    }
}

/// Model picker panel display data.
#[derive(Clone)]
pub struct ModelPanelView {
    pub loading: bool,
    pub error: Option<String>,
    pub empty: bool,
    pub options: Vec<UserOptionView>,
    pub selected_loading: bool,
    pub selected_error: Option<String>,
    pub selected: Option<SelectedModelView>,
}

impl From<&PageSnapshot> for ModelPanelView {
    fn from(page: &PageSnapshot) -> Self {
        let selected_id = page.selected_user.id();
        Self {
            loading: page.users.is_loading(),
            error: page.users.error().map(String::from),
            empty: page.users.is_empty(),
            options: page
                .users
                .items()
                .iter()
                .map(|user: &User| UserOptionView {
                    id: user.id.to_string(),
                    name: user.name.clone(),
                    selected: selected_id == Some(&user.id),
                })
                .collect(),
            selected_loading: matches!(page.selected_user, SelectedUser::Loading(_)),
            selected_error: page.selected_user.error().map(String::from),
            selected: page.selected_user.loaded().map(SelectedModelView::from),
        }
    }
}

/// Try-on panel display data.
///
/// Rendered in priority order: error, generating indicator, prompt, image.
#[derive(Clone)]
pub struct TryOnPanelView {
    pub error: Option<String>,
    pub generating: bool,
    pub image_src: Option<String>,
    pub can_generate: bool,
}

impl From<&PageSnapshot> for TryOnPanelView {
    fn from(page: &PageSnapshot) -> Self {
        Self {
            error: page.try_on.failure().map(|f| f.message.clone()),
            generating: page.try_on.is_requesting(),
            image_src: page.try_on.image_src().map(String::from),
            can_generate: page.can_generate(),
        }
    }
}

/// Cart line on the profile page.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub quantity: u32,
}

/// Full user profile display data.
#[derive(Clone)]
pub struct ProfileView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    pub image_url: Option<String>,
    pub style_preferences: Vec<String>,
    pub purchase_history: Vec<String>,
    pub cart_lines: Vec<CartLineView>,
    pub cart_total: Option<String>,
    pub created_at: Option<String>,
    pub raw_json: String,
}

impl From<&UserDisplay> for ProfileView {
    fn from(display: &UserDisplay) -> Self {
        let user = &display.user;
        let cart_lines = user
            .cart_status
            .iter()
            .flat_map(|cart| &cart.items)
            .map(|item| CartLineView {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
            })
            .collect();

        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            description: user.description.clone(),
            image: display.image.clone(),
            image_url: user.image_url.clone(),
            style_preferences: user.style_preferences.clone(),
            purchase_history: user.purchase_history.iter().map(ToString::to_string).collect(),
            cart_lines,
            cart_total: user
                .cart_status
                .as_ref()
                .map(|cart| format_price(cart.total_price)),
            created_at: user.created_at.clone(),
            raw_json: serde_json::to_string_pretty(display).unwrap_or_default(),
        }
    }
}


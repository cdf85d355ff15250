//! Core types for Fashionary.
//!
//! This module provides the records exchanged with the catalog backend.

pub mod id;
pub mod product;
pub mod status;
pub mod try_on;
pub mod user;

pub use id::*;
pub use product::{Product, ProductDisplay, format_price};
pub use status::*;
pub use try_on::{ApiErrorBody, TryOnRequest, TryOnResponse};
pub use user::{CartItem, CartStatus, User, UserDisplay};

//! Fashionary Core - Shared types library.
//!
//! This crate provides common types used across all Fashionary components:
//! - `storefront` - Catalog and virtual try-on page
//! - `cli` - Command-line tools for browsing the catalog and generating try-ons
//!
//! # Architecture
//!
//! The core crate contains only types and codecs - no I/O and no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`data_url`] - `data:<mime>;base64,<payload>` codec
//! - [`types`] - Product, user, and try-on records exchanged with the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod data_url;
pub mod types;

pub use data_url::{DataUrl, DataUrlError};
pub use types::*;

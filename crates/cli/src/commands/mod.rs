//! Subcommand implementations.
//!
//! Commands write their report to the given writer so they can be checked
//! without a terminal.

pub mod catalog;
pub mod try_on;

//! Virtual Bookshelf Core - Shared types library.
//!
//! This crate provides the domain types used across all bookshelf components:
//! - `server` - The HTTP application (accounts, sessions, catalog API)
//! - `cli` - Command-line tools for migrations and user bootstrap
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and account roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

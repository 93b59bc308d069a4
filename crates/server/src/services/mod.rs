//! Business logic services for the bookshelf server.
//!
//! # Services
//!
//! - `auth` - Account registration, password login, password hashing

pub mod auth;

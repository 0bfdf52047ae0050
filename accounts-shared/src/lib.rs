//! # Accounts Shared Library
//!
//! Types, persistence and authentication primitives used by the accounts
//! API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, bearer tokens and request authentication
//! - `db`: Connection pool and embedded migrations
//! - `models`: Database models and their SQL operations
//! - `repository`: The `UserRepository` seam with Postgres and in-memory backends

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;

/// Current version of the accounts shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

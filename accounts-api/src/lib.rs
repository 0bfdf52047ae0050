//! # Accounts API Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers
//! - `validation`: Request schemas for creating and updating users

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod validation;

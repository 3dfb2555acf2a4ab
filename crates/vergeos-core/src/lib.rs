//! # vergeos-core
//!
//! Core types and HTTP transport for the VergeOS v4 REST API.
//!
//! This crate provides the filter expression builder, query parameter types,
//! error handling, connection configuration and the async [`client::ApiClient`]
//! that the service crates build on.
//!
//! ## Modules
//!
//! - [`filter`] - Filter expression builder for list endpoints
//! - [`query`] - Query parameter builders (fields, pagination, sort)
//! - [`error`] - Error types and HTTP status code mapping
//! - [`config`] - Connection configuration with environment support
//! - [`client`] - Async HTTP client with retry logic

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod query;

// Re-export commonly used types
pub use client::{ApiClient, ApiClientBuilder, RetryPolicy, SystemInfo};
pub use config::VergeConfig;
pub use error::{Error, Result};
pub use filter::{build_filter, Filter, FilterValue};
pub use query::ListQuery;

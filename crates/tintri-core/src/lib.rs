//! # tintri-core
//!
//! Core types shared by the Tintri REST client crates.
//!
//! This crate provides the error taxonomy, client configuration, API version
//! handling, and the request/response building blocks used by `tintri-client`.
//!
//! ## Modules
//!
//! - [`error`] - Transport and API fault types
//! - [`config`] - Client configuration and validation
//! - [`version`] - API version discovery and compatibility gating
//! - [`query`] - Query parameter builder (supports repeated keys)
//! - [`page`] - Paginated list envelope with `next` cursor handling

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod page;
pub mod query;
pub mod version;

// Re-export commonly used types
pub use error::{ApiFault, Error, Result};

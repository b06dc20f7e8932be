//! Session-based REST client for Tintri VMstore appliances and Global
//! Center management servers.
//!
//! The client wraps the appliance REST API behind a small surface: session
//! login/logout, the raw HTTP verbs returning status-carrying responses,
//! streamed file download, and typed operations for the endpoints the
//! bundled command-line utilities exercise.
//!
//! Every call is independent; the only state a caller holds across calls is
//! the [`Session`] token obtained from [`TintriClient::login`], which must be
//! released with [`TintriClient::logout`] on every exit path (or scoped with
//! [`TintriClient::with_session`]). The client never retries; faults are
//! surfaced to the caller as [`tintri_core::Error`].

#![deny(missing_docs)]

pub mod client;
pub mod models;

mod appliance;
mod recommendation;
mod report;
mod servicegroup;
mod session;
mod snapshot;
mod vm;

pub use client::{ApiResponse, TintriClient, TintriClientBuilder};
pub use recommendation::RECOMMENDATION_MIN_MINOR;
pub use servicegroup::SERVICE_GROUP_MIN_MINOR;
pub use session::{Session, SESSION_COOKIE};

/// Convenient result alias that reuses the shared error type.
pub type Result<T> = tintri_core::Result<T>;

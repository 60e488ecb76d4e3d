//! # civicsecure-client
//!
//! Client-side core of the CivicSecure portal, free of any UI toolkit:
//! navigation state, the local TTL cache (drafts, profile, identity
//! verification), form validation, community boards, the information hub,
//! status tracking and an HTTP client for the complaint API.

pub mod api_client;
pub mod cache;
pub mod community;
pub mod config;
pub mod dashboard;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod info_hub;
pub mod local_store;
pub mod profile;
pub mod session;
pub mod state;
pub mod tracking;
pub mod upload;
pub mod verification;

pub use error::{ClientError, Result};

use tracing_subscriber::{fmt, EnvFilter};

/// Install a `tracing` subscriber for hosts embedding the client core.
///
/// Respects `RUST_LOG`; does nothing if a global subscriber already exists.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("civicsecure_client=debug,civicsecure_store=info,warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

//! # civicsecure-store
//!
//! SQLite-backed persistence for CivicSecure.
//!
//! The crate exposes a synchronous [`Database`] handle wrapping a
//! `rusqlite::Connection`. Complaint CRUD is reached through the
//! [`ComplaintRepository`] trait so that the API layer does not depend on SQL.
//! A small key/value table backs the client-local cache.

pub mod complaints;
pub mod database;
pub mod kv;
pub mod migrations;
pub mod repository;
pub mod stats;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use repository::ComplaintRepository;

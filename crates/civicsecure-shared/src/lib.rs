//! # civicsecure-shared
//!
//! Domain types, validation rules and wire DTOs shared by the CivicSecure
//! API server, the persistence layer and the client core.

pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod protocol;
pub mod types;
pub mod validation;

pub use error::{FieldErrors, ValidationErrors};
pub use types::*;

//! `kdom-core` — shared identifiers and the domain error model.
//!
//! This crate has no knowledge of roles or capabilities; it only defines the
//! vocabulary the gate and its callers agree on.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{ResourceId, UserId};

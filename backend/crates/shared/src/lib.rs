//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the client vocabulary:
//! - The stable error taxonomy every failure is classified into
//! - Common error types and result aliases
//! - Typed local identifiers
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;

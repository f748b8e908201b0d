//! # domains
//!
//! The central domain models, error taxonomy, and port definitions for the
//! feedback board. Everything here is pure data and contracts; adapters and
//! services live in their own crates.

pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

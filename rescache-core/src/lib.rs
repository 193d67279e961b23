//! # RESCACHE Core
//!
//! Core types, errors, and clocks for the RESCACHE resource cache.
//!
//! This crate provides the foundational building blocks used by all other RESCACHE crates:
//!
//! - **Types**: Normalized cache keys and the pending/ready/failed resource state
//! - **Errors**: A single error type shared by the cache, resources, and binaries
//! - **Constants**: Configuration defaults
//! - **Traits**: The [`Clock`] seam used to measure entry age
//!
//! ## Example
//!
//! ```rust
//! use rescache_core::{NormalizedKey, CacheError};
//!
//! let key = NormalizedKey::parse("Pikachu").unwrap();
//! assert_eq!(key.as_str(), "pikachu");
//! assert!(matches!(NormalizedKey::parse(""), Err(CacheError::InvalidKey(_))));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{CacheError, Result};
pub use traits::*;
pub use types::*;

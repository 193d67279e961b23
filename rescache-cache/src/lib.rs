//! Name-keyed, time-expiring resource cache.
//!
//! Memoizes one [`Resource`](rescache_resource::Resource) per case-insensitive key
//! for a freshness window. Staleness is only checked when a key is looked up;
//! nothing is swept in the background.
//!
//! ## Example
//!
//! ```rust
//! use rescache_cache::{CacheConfig, ResourceCache};
//! use rescache_resource::Resource;
//!
//! let cache = ResourceCache::with_config(CacheConfig::default());
//! let first = cache.get_or_create("Pikachu", || Resource::ready(25u16)).unwrap();
//! let again = cache.get_or_create("pikachu", || Resource::ready(0u16)).unwrap();
//! assert!(Resource::ptr_eq(&first, &again));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod config;

pub use cache::{CacheStats, ResourceCache};
pub use config::CacheConfig;

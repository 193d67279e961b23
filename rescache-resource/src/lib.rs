//! Shared handles around asynchronous computations.
//!
//! A [`Resource`] wraps a computation that is pending, ready, or failed. It can be
//! read synchronously (a pending read reports [`CacheError::Suspended`]) or awaited.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod resource;

pub use resource::{Resource, ResourceCompleter, ResourceId};

pub use rescache_core::{CacheError, ResourceFailure, ResourceState, Result};

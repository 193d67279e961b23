//! Domain types for RESCACHE.
//!
//! - [`NormalizedKey`]: Case-insensitive lookup key
//! - [`ResourceState`]: Pending / ready / failed snapshot of a resource
//! - [`ResourceFailure`]: Failure captured from a computation

mod key;
mod state;

pub use key::*;
pub use state::*;

//! Resource state snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Failure captured from a resource's computation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFailure {
    /// Human-readable failure message
    pub message: String,
}

impl ResourceFailure {
    /// Creates a failure from any displayable error.
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ResourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ResourceFailure {}

impl From<ResourceFailure> for CacheError {
    fn from(failure: ResourceFailure) -> Self {
        CacheError::ResourceFailed(failure.message)
    }
}

/// Where a resource's computation currently stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceState<T> {
    /// Still running.
    Pending,
    /// Settled successfully.
    Ready(T),
    /// Settled with a failure.
    Failed(ResourceFailure),
}

impl<T> ResourceState<T> {
    /// Returns true while the computation has not settled.
    pub fn is_pending(&self) -> bool {
        matches!(self, ResourceState::Pending)
    }

    /// Returns true once the computation has settled, either way.
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Converts the snapshot into the read contract: value, suspend, or failure.
    pub fn into_result(self) -> Result<T> {
        match self {
            ResourceState::Pending => Err(CacheError::Suspended),
            ResourceState::Ready(value) => Ok(value),
            ResourceState::Failed(failure) => Err(failure.into()),
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceState::Pending => "pending",
            ResourceState::Ready(_) => "ready",
            ResourceState::Failed(_) => "failed",
        }
    }
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        ResourceState::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_result() {
        assert_eq!(ResourceState::Ready(7).into_result().unwrap(), 7);
        assert!(matches!(
            ResourceState::<u8>::Pending.into_result(),
            Err(CacheError::Suspended)
        ));
        match ResourceState::<u8>::Failed(ResourceFailure::new("not found")).into_result() {
            Err(CacheError::ResourceFailed(msg)) => assert_eq!(msg, "not found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_state_flags() {
        let pending = ResourceState::<()>::default();
        assert!(pending.is_pending());
        assert_eq!(pending.label(), "pending");
        assert!(ResourceState::Ready(()).is_settled());
        assert_eq!(ResourceState::<()>::Failed(ResourceFailure::new("x")).label(), "failed");
    }
}

//! Resource handle backed by a `watch` channel.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use rescache_core::constants::DROPPED_COMPUTATION_MESSAGE;
use rescache_core::error::{CacheError, Result};
use rescache_core::types::{ResourceFailure, ResourceState};

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique resource identifier, for logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    fn next() -> Self {
        Self(NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "res-{}", self.0)
    }
}

struct Inner<T> {
    id: ResourceId,
    state: watch::Receiver<ResourceState<T>>,
}

/// Shared handle to an in-flight or settled computation.
///
/// Clones point at the same computation. Identity is by reference: two handles
/// are the same resource iff [`Resource::ptr_eq`] holds, regardless of value.
pub struct Resource<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Resource<T> {
    /// Creates a pending resource and the completer that settles it.
    pub fn channel() -> (ResourceCompleter<T>, Self) {
        let (tx, rx) = watch::channel(ResourceState::Pending);
        let id = ResourceId::next();
        let resource = Self {
            inner: Arc::new(Inner { id, state: rx }),
        };
        (ResourceCompleter { id, tx }, resource)
    }

    /// Starts `future` on the current tokio runtime and wraps its outcome.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F, E>(future: F) -> Self
    where
        F: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let (completer, resource) = Self::channel();
        tokio::spawn(async move {
            match future.await {
                Ok(value) => completer.resolve(value),
                Err(e) => completer.reject(e),
            }
        });
        resource
    }

    /// Creates an already-settled resource.
    pub fn ready(value: T) -> Self {
        let (completer, resource) = Self::channel();
        completer.resolve(value);
        resource
    }

    /// Creates an already-failed resource.
    pub fn failed(message: impl fmt::Display) -> Self {
        let (completer, resource) = Self::channel();
        completer.reject(message);
        resource
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }

    /// Reads the value without waiting.
    ///
    /// Returns [`CacheError::Suspended`] while pending and
    /// [`CacheError::ResourceFailed`] when the computation failed.
    pub fn read(&self) -> Result<T> {
        self.state().into_result()
    }

    /// Waits for the computation to settle.
    pub async fn wait(&self) -> Result<T> {
        let mut rx = self.inner.state.clone();
        loop {
            {
                let state = rx.borrow_and_update();
                if state.is_settled() {
                    return state.clone().into_result();
                }
            }
            if rx.changed().await.is_err() {
                // Completer is gone; whatever it last published is final.
                return match rx.borrow().clone() {
                    ResourceState::Pending => Err(CacheError::ResourceFailed(
                        DROPPED_COMPUTATION_MESSAGE.to_string(),
                    )),
                    settled => settled.into_result(),
                };
            }
        }
    }
}

impl<T> Resource<T> {
    /// Returns this resource's identifier.
    pub fn id(&self) -> ResourceId {
        self.inner.id
    }

    /// Returns true if both handles point at the same computation.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<T> fmt::Debug for Resource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("id", &self.inner.id)
            .field("state", &self.inner.state.borrow().label())
            .finish()
    }
}

/// Write side of a [`Resource`]. Settles it exactly once.
///
/// Dropping a completer without settling leaves readers of [`Resource::read`]
/// suspended and makes [`Resource::wait`] fail.
pub struct ResourceCompleter<T> {
    id: ResourceId,
    tx: watch::Sender<ResourceState<T>>,
}

impl<T> ResourceCompleter<T> {
    /// Settles the resource with a value.
    pub fn resolve(self, value: T) {
        debug!(resource = %self.id, "Resource ready");
        self.tx.send_replace(ResourceState::Ready(value));
    }

    /// Settles the resource with a failure.
    pub fn reject(self, error: impl fmt::Display) {
        let failure = ResourceFailure::new(error);
        debug!(resource = %self.id, error = %failure, "Resource failed");
        self.tx.send_replace(ResourceState::Failed(failure));
    }

    /// Returns the identifier of the resource this completer settles.
    pub fn id(&self) -> ResourceId {
        self.id
    }
}

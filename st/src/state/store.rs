//! StateStore trait definition

use async_trait::async_trait;

use super::manager::StateError;
use crate::context::ProcessorContext;

/// A named local state store owned by one task
///
/// Concrete stores (key-value engines, window stores) live outside this
/// crate. The task only drives the lifecycle: bind to a context once,
/// flush on demand, close at the end. Stores are handed out behind
/// `Arc` so callers can read while the task retains ownership of the
/// lifecycle.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Store name, unique within a topology
    fn name(&self) -> &str;

    /// Bind the store to its task context
    ///
    /// Called exactly once, after offset limits are established and
    /// before the store is registered with the state manager. Restoring
    /// from a changelog happens in here, bounded by the partition's
    /// offset limit.
    async fn init(&self, context: &ProcessorContext) -> Result<(), StateError>;

    /// Make buffered writes durable
    async fn flush(&self) -> Result<(), StateError>;

    /// Release resources, flushing first if needed
    async fn close(&self) -> Result<(), StateError>;

    /// Whether the store survives restarts and is checkpointed
    fn persistent(&self) -> bool;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock state store counting lifecycle calls
    pub struct MockStateStore {
        name: String,
        persistent: bool,
        fail_init: AtomicBool,
        inits: AtomicUsize,
        flushes: AtomicUsize,
        closes: AtomicUsize,
    }

    impl MockStateStore {
        pub fn new(name: impl Into<String>) -> Self {
            Self {
                name: name.into(),
                persistent: true,
                fail_init: AtomicBool::new(false),
                inits: AtomicUsize::new(0),
                flushes: AtomicUsize::new(0),
                closes: AtomicUsize::new(0),
            }
        }

        /// Script the next init() call to fail
        pub fn fail_init(self) -> Self {
            self.fail_init.store(true, Ordering::SeqCst);
            self
        }

        pub fn inits(&self) -> usize {
            self.inits.load(Ordering::SeqCst)
        }

        pub fn flushes(&self) -> usize {
            self.flushes.load(Ordering::SeqCst)
        }

        pub fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StateStore for MockStateStore {
        fn name(&self) -> &str {
            &self.name
        }

        async fn init(&self, _context: &ProcessorContext) -> Result<(), StateError> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            if self.fail_init.load(Ordering::SeqCst) {
                return Err(StateError::Store {
                    name: self.name.clone(),
                    detail: "scripted init failure".to_string(),
                });
            }
            Ok(())
        }

        async fn flush(&self) -> Result<(), StateError> {
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn close(&self) -> Result<(), StateError> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn persistent(&self) -> bool {
            self.persistent
        }
    }
}

//! Write-back cache seam
//!
//! The engine may buffer store mutations in a shared cache to batch
//! downstream writes. The task only needs one hook: drain my share
//! before my stores flush, so nothing sits in memory that the
//! checkpoint claims is durable.

use async_trait::async_trait;

use super::manager::StateError;
use crate::domain::TaskId;

/// Shared write-back buffer for store mutations
#[async_trait]
pub trait WriteBackCache: Send + Sync {
    /// Drain entries buffered for the given task
    async fn flush(&self, task: &TaskId) -> Result<(), StateError>;
}

/// Cache that buffers nothing
///
/// The default for engines and tests that write through directly.
#[derive(Debug, Default)]
pub struct NoopCache;

#[async_trait]
impl WriteBackCache for NoopCache {
    async fn flush(&self, _task: &TaskId) -> Result<(), StateError> {
        Ok(())
    }
}

//! StateManager trait definition
//!
//! The state manager owns everything on disk for one task: registered
//! stores, per-partition restoration limits, and the offset checkpoint
//! that ties store contents to durably processed input. The task
//! funnels every store-lifecycle operation through it so the checkpoint
//! can never drift from what the stores actually hold.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use super::store::StateStore;
use crate::context::ProcessorContext;
use crate::domain::TopicPartition;

/// Changelog topic name for a store, by convention
///
/// Every persistent store replicates into
/// `<application_id>-<store>-changelog`; restoration reads the same
/// topic back.
pub fn store_changelog_topic(application_id: &str, store: &str) -> String {
    format!("{application_id}-{store}-changelog")
}

/// Errors from the state layer (manager, stores, cache)
#[derive(Debug, Error)]
pub enum StateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store {name}: {detail}")]
    Store { name: String, detail: String },

    #[error("Checkpoint failed: {detail}")]
    Checkpoint { detail: String },
}

/// Per-task state orchestration
///
/// Exclusively owned by one task, which serializes all calls; taking
/// `&self` leaves implementations free to dispatch over channels or
/// use interior mutability. `close` must be crash-atomic: if it fails
/// partway, the next startup has to detect the torn checkpoint and
/// force a full restoration.
#[async_trait]
pub trait StateManager: Send + Sync {
    /// Record the restoration floor for a partition
    ///
    /// Restoration must not replay changelog records below the limit's
    /// committed floor. Re-recording a limit for the same partition
    /// replaces it.
    async fn put_offset_limit(
        &self,
        partition: &TopicPartition,
        limit: u64,
    ) -> Result<(), StateError>;

    /// Take ownership of a store that has been bound to its context
    async fn register_store(&self, store: Arc<dyn StateStore>) -> Result<(), StateError>;

    /// Look up a registered store by name
    fn get_store(&self, name: &str) -> Option<Arc<dyn StateStore>>;

    /// Flush every registered store
    async fn flush(&self, context: &ProcessorContext) -> Result<(), StateError>;

    /// Flush and close every store, then checkpoint the given offsets
    ///
    /// An empty map means "checkpoint whatever is currently durable"
    /// and is not an error.
    async fn close(&self, offsets: BTreeMap<TopicPartition, u64>) -> Result<(), StateError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_changelog_topic() {
        assert_eq!(
            store_changelog_topic("wordcount", "counts"),
            "wordcount-counts-changelog"
        );
    }

    #[test]
    fn test_state_error_display() {
        let err = StateError::Store {
            name: "counts".to_string(),
            detail: "compaction failed".to_string(),
        };
        assert_eq!(err.to_string(), "Store counts: compaction failed");

        let err = StateError::Checkpoint {
            detail: "torn write".to_string(),
        };
        assert_eq!(err.to_string(), "Checkpoint failed: torn write");
    }

    #[test]
    fn test_state_error_from_io() {
        let err: StateError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, StateError::Io(_)));
    }
}

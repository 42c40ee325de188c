//! OffsetConsumer trait definition
//!
//! Boundary to the messaging client that owns committed-offset state.
//! The task only ever asks two things of it: where did the group last
//! commit on a partition, and commit these offsets now. Connection
//! management, retries, and timeouts all live behind the trait.

use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::TopicPartition;

/// Errors surfaced by the messaging client
///
/// Interruption is deliberately its own variant: a wakeup delivered
/// while blocked in the client is a control signal, not a failure, and
/// the task must re-raise it unchanged.
#[derive(Debug, Clone, Error)]
pub enum ConsumerError {
    #[error("Not authorized to access {topic}")]
    Authorization { topic: String },

    #[error("Interrupted while waiting on the consumer")]
    Interrupted,

    #[error("Consumer client error: {message}")]
    Client { message: String },
}

impl ConsumerError {
    /// Check if this is the interrupt control signal
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ConsumerError::Interrupted)
    }

    /// Check if this is an authorization failure
    pub fn is_authorization(&self) -> bool {
        matches!(self, ConsumerError::Authorization { .. })
    }
}

/// Committed-offset access for a task's assigned partitions
///
/// Implementations wrap the real messaging client. Calls may block
/// (suspend) indefinitely; cancellation arrives as
/// [`ConsumerError::Interrupted`].
#[async_trait]
pub trait OffsetConsumer: Send + Sync {
    /// Last committed offset for the partition, or None if the group
    /// has never committed on it
    async fn committed(&self, partition: &TopicPartition) -> Result<Option<u64>, ConsumerError>;

    /// Commit the given offsets for the group
    async fn commit(&self, offsets: &BTreeMap<TopicPartition, u64>) -> Result<(), ConsumerError>;
}

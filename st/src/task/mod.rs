//! Task roles
//!
//! TaskCore carries the lifecycle machinery every role shares; the
//! Task trait layers role behavior on top. StreamTask actively
//! processes and commits input, StandbyTask keeps a shadow copy of the
//! state warm for failover.

mod core;
mod standby;
mod stream;

pub use self::core::TaskCore;
pub use standby::StandbyTask;
pub use stream::StreamTask;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::TopicPartition;
use crate::error::TaskError;

/// Role capabilities layered over [`TaskCore`]
///
/// One worker drives a task at a time; the trait is object safe so an
/// engine can hold `Box<dyn Task>` per assignment without caring which
/// role it is.
#[async_trait]
pub trait Task: Send + Sync {
    /// Shared lifecycle core
    fn core(&self) -> &TaskCore;

    /// Shared lifecycle core, mutable
    fn core_mut(&mut self) -> &mut TaskCore;

    /// Make processed state and consumed offsets durable
    async fn commit(&mut self) -> Result<(), TaskError>;

    /// Commit consumed offsets without flushing state
    async fn commit_offsets(&mut self) -> Result<(), TaskError>;

    /// Offsets the role's record collector has durably produced
    ///
    /// Checkpointed when the task closes. Roles without a record
    /// collector keep the default empty map, which checkpoints
    /// whatever is already durable.
    fn record_collector_offsets(&self) -> BTreeMap<TopicPartition, u64> {
        BTreeMap::new()
    }

    /// Terminal close: checkpoint collector offsets and release state
    async fn close(&mut self) -> Result<(), TaskError> {
        let offsets = self.record_collector_offsets();
        self.core_mut().close_state_manager(offsets).await
    }
}

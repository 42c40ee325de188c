//! Active processing role

use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::debug;

use super::{Task, TaskCore};
use crate::consumer::ConsumerError;
use crate::domain::TopicPartition;
use crate::error::TaskError;

/// Task that processes records and commits its input
///
/// The surrounding engine feeds it two progress signals: the offset of
/// each record it consumed, and the offsets its record collector has
/// durably produced downstream. Consumed offsets are committed on
/// [`Task::commit`]; produced offsets are checkpointed on close.
pub struct StreamTask {
    core: TaskCore,
    consumed: BTreeMap<TopicPartition, u64>,
    produced: BTreeMap<TopicPartition, u64>,
}

impl StreamTask {
    pub fn new(core: TaskCore) -> Self {
        Self {
            core,
            consumed: BTreeMap::new(),
            produced: BTreeMap::new(),
        }
    }

    /// Note the offset of a record consumed from a partition
    pub fn record_consumed(&mut self, partition: TopicPartition, offset: u64) {
        self.consumed.insert(partition, offset);
    }

    /// Note an offset the record collector has durably produced
    pub fn record_produced(&mut self, partition: TopicPartition, offset: u64) {
        self.produced.insert(partition, offset);
    }
}

#[async_trait]
impl Task for StreamTask {
    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    async fn commit(&mut self) -> Result<(), TaskError> {
        debug!(task = %self.core.id(), "committing");
        self.core.flush_state().await?;
        self.commit_offsets().await
    }

    async fn commit_offsets(&mut self) -> Result<(), TaskError> {
        if self.consumed.is_empty() {
            return Ok(());
        }

        // Commit the next offset to consume, one past the last processed.
        let to_commit: BTreeMap<TopicPartition, u64> = self
            .consumed
            .iter()
            .map(|(tp, offset)| (tp.clone(), offset.saturating_add(1)))
            .collect();

        debug!(task = %self.core.id(), offsets = to_commit.len(), "committing consumed offsets");
        match self.core.consumer().commit(&to_commit).await {
            Ok(()) => Ok(()),
            Err(ConsumerError::Interrupted) => Err(TaskError::Interrupted),
            Err(e) => Err(TaskError::OffsetCommit {
                task: self.core.id(),
                source: e,
            }),
        }
    }

    fn record_collector_offsets(&self) -> BTreeMap<TopicPartition, u64> {
        self.produced.clone()
    }
}

//! Passive replication role

use async_trait::async_trait;
use tracing::debug;

use super::{Task, TaskCore};
use crate::error::TaskError;

/// Task that keeps a warm replica of another task's state
///
/// A standby consumes nothing and produces nothing; it only replays
/// changelogs into its local stores. Committing therefore reduces to
/// flushing state, and closing checkpoints no collector offsets.
pub struct StandbyTask {
    core: TaskCore,
}

impl StandbyTask {
    pub fn new(core: TaskCore) -> Self {
        Self { core }
    }
}

#[async_trait]
impl Task for StandbyTask {
    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    async fn commit(&mut self) -> Result<(), TaskError> {
        debug!(task = %self.core.id(), "committing standby");
        self.core.flush_state().await
    }

    async fn commit_offsets(&mut self) -> Result<(), TaskError> {
        // No input offsets to commit; restoration progress lives in the
        // state manager's checkpoint.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Arc;

    use crate::config::TaskConfig;
    use crate::consumer::mock::MockOffsetConsumer;
    use crate::domain::{TaskId, TaskPhase, TopicPartition};
    use crate::state::manager::mock::{MockStateManager, SharedMockStateManager};
    use crate::state::store::mock::MockStateStore;
    use crate::state::{NoopCache, StateManager};
    use crate::topology::Topology;
    use crate::topology::mock::MockStoreBuilder;

    async fn ready_standby(
        consumer: Arc<MockOffsetConsumer>,
        mgr: &Arc<MockStateManager>,
        store: &Arc<MockStateStore>,
    ) -> StandbyTask {
        let config = TaskConfig {
            application_id: "wordcount".to_string(),
            ..Default::default()
        };
        let topology =
            Topology::new().with_store(Arc::new(MockStoreBuilder::new(Arc::clone(store))));
        let partitions: BTreeSet<TopicPartition> =
            [TopicPartition::new("orders", 0)].into_iter().collect();
        let shared = Arc::clone(mgr);
        let core = TaskCore::new(
            TaskId::new(1, 0),
            &config,
            partitions,
            Arc::new(topology),
            consumer,
            Arc::new(NoopCache),
            move |_ctx| Ok(Box::new(SharedMockStateManager(shared)) as Box<dyn StateManager>),
        )
        .unwrap();

        let mut task = StandbyTask::new(core);
        task.core_mut().initialize().await.unwrap();
        task
    }

    #[tokio::test]
    async fn test_commit_flushes_without_committing_offsets() {
        let consumer = Arc::new(MockOffsetConsumer::new());
        let mgr = Arc::new(MockStateManager::new());
        let store = Arc::new(MockStateStore::new("counts"));
        let mut task = ready_standby(Arc::clone(&consumer), &mgr, &store).await;

        task.commit().await.unwrap();

        assert_eq!(store.flushes(), 1);
        assert!(consumer.commits().is_empty());
        assert_eq!(task.core().phase(), TaskPhase::Ready);
    }

    #[tokio::test]
    async fn test_close_checkpoints_no_collector_offsets() {
        let consumer = Arc::new(MockOffsetConsumer::new());
        let mgr = Arc::new(MockStateManager::new());
        let store = Arc::new(MockStateStore::new("counts"));
        let mut task = ready_standby(consumer, &mgr, &store).await;

        assert!(task.record_collector_offsets().is_empty());
        task.close().await.unwrap();

        assert_eq!(mgr.closed_with(), Some(BTreeMap::new()));
        assert_eq!(task.core().phase(), TaskPhase::Closed);
    }
}

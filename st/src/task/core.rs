//! Shared task lifecycle machinery
//!
//! TaskCore carries everything the task roles have in common: identity,
//! the assigned partition set, the state manager, and the two-step
//! initialization that makes local state safe to use. Offset limits
//! come first so restoration can never replay input the group already
//! processed; stores bind second; only then is the task ready to
//! process, flush, and eventually close against a durable checkpoint.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::TaskConfig;
use crate::consumer::{ConsumerError, OffsetConsumer};
use crate::context::ProcessorContext;
use crate::domain::{TaskId, TaskPhase, TopicPartition};
use crate::error::TaskError;
use crate::state::{StateError, StateManager, StateStore, WriteBackCache};
use crate::topology::Topology;

/// Lifecycle core shared by all task roles
///
/// Owned and driven by exactly one worker at a time. Operations take
/// `&mut self`; moving the task between workers is fine between
/// operations, concurrent access is not.
pub struct TaskCore {
    id: TaskId,
    application_id: String,
    partitions: BTreeSet<TopicPartition>,
    topology: Arc<Topology>,
    consumer: Arc<dyn OffsetConsumer>,
    state_mgr: Box<dyn StateManager>,
    context: ProcessorContext,
    phase: TaskPhase,
}

impl TaskCore {
    /// Create a task with its state manager
    ///
    /// The factory runs inside construction so the task either exists
    /// with a working state manager or not at all; a factory failure is
    /// a state initialization error.
    pub fn new<F>(
        id: TaskId,
        config: &TaskConfig,
        partitions: BTreeSet<TopicPartition>,
        topology: Arc<Topology>,
        consumer: Arc<dyn OffsetConsumer>,
        cache: Arc<dyn WriteBackCache>,
        state_mgr_factory: F,
    ) -> Result<Self, TaskError>
    where
        F: FnOnce(&ProcessorContext) -> Result<Box<dyn StateManager>, StateError>,
    {
        let context = ProcessorContext::new(
            id,
            config.application_id.clone(),
            config.task_state_dir(id),
            cache,
        );

        let state_mgr = state_mgr_factory(&context).map_err(|e| TaskError::StateInitialization {
            task: id,
            detail: "failed to create the state manager".to_string(),
            source: Box::new(e),
        })?;

        debug!(task = %id, partitions = partitions.len(), "task created");

        Ok(Self {
            id,
            application_id: config.application_id.clone(),
            partitions,
            topology,
            consumer,
            state_mgr,
            context,
            phase: TaskPhase::Created,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Assigned partitions, fixed for the task's lifetime
    pub fn partitions(&self) -> &BTreeSet<TopicPartition> {
        &self.partitions
    }

    pub fn topology(&self) -> &Arc<Topology> {
        &self.topology
    }

    pub fn consumer(&self) -> &Arc<dyn OffsetConsumer> {
        &self.consumer
    }

    pub fn context(&self) -> &ProcessorContext {
        &self.context
    }

    pub fn cache(&self) -> &Arc<dyn WriteBackCache> {
        self.context.cache()
    }

    pub fn phase(&self) -> TaskPhase {
        self.phase
    }

    /// Establish the recovery boundary for every assigned partition
    ///
    /// Fetches the group's last committed offset per partition and
    /// records it as the floor below which restoration must not read.
    /// A partition with no committed offset gets floor 0. Interrupts
    /// pass through unchanged and leave the phase untouched; any other
    /// failure is fatal.
    pub async fn initialize_offset_limits(&mut self) -> Result<(), TaskError> {
        self.require_phase(TaskPhase::Created, "initialize_offset_limits")?;
        debug!(task = %self.id, partitions = self.partitions.len(), "initializing offset limits");

        match self.fetch_and_record_limits().await {
            Ok(()) => {
                self.set_phase(TaskPhase::LimitsInitialized);
                Ok(())
            }
            Err(TaskError::Interrupted) => Err(TaskError::Interrupted),
            Err(e) => {
                self.set_phase(TaskPhase::Failed);
                Err(e)
            }
        }
    }

    async fn fetch_and_record_limits(&mut self) -> Result<(), TaskError> {
        let partitions: Vec<TopicPartition> = self.partitions.iter().cloned().collect();
        for partition in partitions {
            let committed = match self.consumer.committed(&partition).await {
                Ok(committed) => committed,
                Err(ConsumerError::Interrupted) => return Err(TaskError::Interrupted),
                Err(e) => {
                    let detail = if e.is_authorization() {
                        format!("authorization failure while initializing offsets for {partition}")
                    } else {
                        format!("failed to initialize offsets for {partition}")
                    };
                    return Err(TaskError::StateInitialization {
                        task: self.id,
                        detail,
                        source: Box::new(e),
                    });
                }
            };

            // No committed offset means a fresh assignment: restore from the beginning.
            let limit = committed.unwrap_or(0);
            self.state_mgr
                .put_offset_limit(&partition, limit)
                .await
                .map_err(|e| TaskError::StateInitialization {
                    task: self.id,
                    detail: format!("failed to record offset limit for {partition}"),
                    source: Box::new(e),
                })?;
            debug!(task = %self.id, partition = %partition, limit, "offset limit recorded");
        }
        Ok(())
    }

    /// Build, bind, and register every store the topology declares
    ///
    /// Runs strictly after [`initialize_offset_limits`] so restoration
    /// inside `init` respects the recorded floors. Each store is built
    /// fresh for this task, bound to the context, then handed to the
    /// state manager. One failure aborts the whole step; a task never
    /// becomes ready with a partial store set.
    ///
    /// [`initialize_offset_limits`]: TaskCore::initialize_offset_limits
    pub async fn initialize_state_stores(&mut self) -> Result<(), TaskError> {
        self.require_phase(TaskPhase::LimitsInitialized, "initialize_state_stores")?;
        debug!(
            task = %self.id,
            stores = self.topology.store_builders().len(),
            "initializing state stores"
        );

        match self.build_and_register_stores().await {
            Ok(()) => {
                self.set_phase(TaskPhase::Ready);
                info!(task = %self.id, "task ready");
                Ok(())
            }
            Err(e) => {
                self.set_phase(TaskPhase::Failed);
                Err(e)
            }
        }
    }

    async fn build_and_register_stores(&mut self) -> Result<(), TaskError> {
        let topology = Arc::clone(&self.topology);
        for builder in topology.store_builders() {
            let store = builder.build();
            let name = store.name().to_string();

            store
                .init(&self.context)
                .await
                .map_err(|e| TaskError::StateInitialization {
                    task: self.id,
                    detail: format!("failed to initialize state store {name}"),
                    source: Box::new(e),
                })?;

            self.state_mgr
                .register_store(Arc::clone(&store))
                .await
                .map_err(|e| TaskError::StateInitialization {
                    task: self.id,
                    detail: format!("failed to register state store {name}"),
                    source: Box::new(e),
                })?;

            debug!(task = %self.id, store = %name, "state store registered");
        }
        Ok(())
    }

    /// Run both initialization steps in order
    pub async fn initialize(&mut self) -> Result<(), TaskError> {
        self.initialize_offset_limits().await?;
        self.initialize_state_stores().await
    }

    /// Look up an initialized store by name
    ///
    /// Returns None for names the topology does not declare and for
    /// any name before [`initialize_state_stores`] has completed.
    ///
    /// [`initialize_state_stores`]: TaskCore::initialize_state_stores
    pub fn get_store(&self, name: &str) -> Option<Arc<dyn StateStore>> {
        self.state_mgr.get_store(name)
    }

    /// Make buffered state durable
    ///
    /// Drains this task's share of the write-back cache first, then
    /// flushes every registered store. Safe to call repeatedly while
    /// the task is ready.
    pub async fn flush_state(&mut self) -> Result<(), TaskError> {
        self.require_phase(TaskPhase::Ready, "flush_state")?;
        debug!(task = %self.id, "flushing state");

        if let Err(e) = self.context.cache().flush(&self.id).await {
            self.set_phase(TaskPhase::Failed);
            return Err(TaskError::StateFlush {
                task: self.id,
                source: e,
            });
        }

        if let Err(e) = self.state_mgr.flush(&self.context).await {
            self.set_phase(TaskPhase::Failed);
            return Err(TaskError::StateFlush {
                task: self.id,
                source: e,
            });
        }

        Ok(())
    }

    /// Close the state manager, checkpointing the given final offsets
    ///
    /// The offsets come from the role's record collector; an empty map
    /// checkpoints whatever is already durable. On failure the on-disk
    /// state must be treated as inconsistent: the task goes to Failed
    /// and the next owner of this state has to restore from scratch.
    pub async fn close_state_manager(
        &mut self,
        final_offsets: BTreeMap<TopicPartition, u64>,
    ) -> Result<(), TaskError> {
        self.require_phase(TaskPhase::Ready, "close_state_manager")?;
        info!(task = %self.id, offsets = final_offsets.len(), "closing state manager");

        match self.state_mgr.close(final_offsets).await {
            Ok(()) => {
                self.set_phase(TaskPhase::Closed);
                info!(task = %self.id, "state manager closed");
                Ok(())
            }
            Err(e) => {
                warn!(task = %self.id, error = %e, "state manager close failed");
                self.set_phase(TaskPhase::Failed);
                Err(TaskError::StateClose {
                    task: self.id,
                    source: e,
                })
            }
        }
    }

    fn require_phase(&self, expected: TaskPhase, operation: &'static str) -> Result<(), TaskError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(TaskError::InvalidTransition {
                task: self.id,
                phase: self.phase,
                operation,
            })
        }
    }

    fn set_phase(&mut self, phase: TaskPhase) {
        debug!(task = %self.id, from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }
}

impl std::fmt::Display for TaskCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let partitions: Vec<String> = self.partitions.iter().map(ToString::to_string).collect();
        write!(
            f,
            "task {} [{}] {} partitions: [{}]",
            self.id,
            self.phase,
            self.topology,
            partitions.join(", ")
        )
    }
}

impl std::fmt::Debug for TaskCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskCore")
            .field("id", &self.id)
            .field("application_id", &self.application_id)
            .field("partitions", &self.partitions)
            .field("topology", &self.topology)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

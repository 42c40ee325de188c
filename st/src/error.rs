//! Task error types
//!
//! Closed taxonomy for everything a task can report. Underlying causes
//! ride along as sources instead of being flattened into strings, so a
//! supervisor can still tell an authorization failure from a disk
//! failure three layers down.

use thiserror::Error;

use crate::consumer::ConsumerError;
use crate::domain::{TaskId, TaskPhase};
use crate::state::StateError;

/// Errors reported by task lifecycle operations
#[derive(Debug, Error)]
pub enum TaskError {
    /// Failure while establishing the recovery boundary or binding
    /// state stores. The task is not usable afterwards.
    #[error("Task {task}: {detail}")]
    StateInitialization {
        task: TaskId,
        detail: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failure draining the cache or flushing stores
    #[error("Task {task}: failed to flush state")]
    StateFlush {
        task: TaskId,
        #[source]
        source: StateError,
    },

    /// Failure closing the state manager; on-disk state may be
    /// inconsistent and the next startup must restore from scratch
    #[error("Task {task}: failed to close the state manager")]
    StateClose {
        task: TaskId,
        #[source]
        source: StateError,
    },

    /// Failure committing consumed offsets
    #[error("Task {task}: failed to commit offsets")]
    OffsetCommit {
        task: TaskId,
        #[source]
        source: ConsumerError,
    },

    /// Deliberate interrupt delivered while blocked in a collaborator.
    /// Not a failure; the task's phase is unchanged.
    #[error("Interrupted")]
    Interrupted,

    /// Operation invoked in a phase that forbids it
    #[error("Task {task}: {operation} is not allowed in phase {phase}")]
    InvalidTransition {
        task: TaskId,
        phase: TaskPhase,
        operation: &'static str,
    },
}

impl TaskError {
    /// Check if this is the interrupt control signal
    pub fn is_interrupted(&self) -> bool {
        matches!(self, TaskError::Interrupted)
    }

    /// Check if the task must be discarded
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TaskError::StateInitialization { .. }
                | TaskError::StateFlush { .. }
                | TaskError::StateClose { .. }
        )
    }

    /// Check if the root cause is an authorization failure
    pub fn is_authorization(&self) -> bool {
        match self {
            TaskError::StateInitialization { source, .. } => source
                .downcast_ref::<ConsumerError>()
                .is_some_and(|e| e.is_authorization()),
            _ => false,
        }
    }
}

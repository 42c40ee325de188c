//! Per-task processing context
//!
//! Handed to every store at bind time and to the state manager on
//! flush. Carries the identity and paths a store needs to find its
//! on-disk home; valid from task construction until close.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::TaskId;
use crate::state::WriteBackCache;

/// Context a task exposes to its stores
#[derive(Clone)]
pub struct ProcessorContext {
    task_id: TaskId,
    application_id: String,
    state_dir: PathBuf,
    cache: Arc<dyn WriteBackCache>,
}

impl ProcessorContext {
    pub fn new(
        task_id: TaskId,
        application_id: impl Into<String>,
        state_dir: PathBuf,
        cache: Arc<dyn WriteBackCache>,
    ) -> Self {
        Self {
            task_id,
            application_id: application_id.into(),
            state_dir,
            cache,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Directory this task's persistent stores live under
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn cache(&self) -> &Arc<dyn WriteBackCache> {
        &self.cache
    }
}

impl std::fmt::Debug for ProcessorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorContext")
            .field("task_id", &self.task_id)
            .field("application_id", &self.application_id)
            .field("state_dir", &self.state_dir)
            .finish_non_exhaustive()
    }
}

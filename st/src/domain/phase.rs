//! Task lifecycle phases
//!
//! Tracks where a task sits in its create/recover/process/close cycle.
//! Transitions are driven by the task itself; callers only observe.

use serde::{Deserialize, Serialize};

/// Lifecycle position of a task
///
/// ```text
/// Created -> LimitsInitialized -> Ready -> Closed
///    \            \                 \
///     +------------+-----------------+--> Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPhase {
    /// Constructed, recovery boundary not yet established
    #[default]
    Created,
    /// Offset limits recorded for every assigned partition
    LimitsInitialized,
    /// State stores bound and registered, able to process and flush
    Ready,
    /// State manager closed cleanly, checkpoint durable
    Closed,
    /// Fatal error, task must be discarded
    Failed,
}

impl std::fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::LimitsInitialized => write!(f, "limits_initialized"),
            Self::Ready => write!(f, "ready"),
            Self::Closed => write!(f, "closed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl TaskPhase {
    /// Check if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskPhase::Closed | TaskPhase::Failed)
    }

    /// Check if the task can process records and flush state
    pub fn is_ready(&self) -> bool {
        matches!(self, TaskPhase::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_default_is_created() {
        assert_eq!(TaskPhase::default(), TaskPhase::Created);
    }

    #[test]
    fn test_phase_is_terminal() {
        assert!(!TaskPhase::Created.is_terminal());
        assert!(!TaskPhase::LimitsInitialized.is_terminal());
        assert!(!TaskPhase::Ready.is_terminal());
        assert!(TaskPhase::Closed.is_terminal());
        assert!(TaskPhase::Failed.is_terminal());
    }

    #[test]
    fn test_phase_is_ready() {
        assert!(TaskPhase::Ready.is_ready());
        assert!(!TaskPhase::Created.is_ready());
        assert!(!TaskPhase::Failed.is_ready());
    }

    #[test]
    fn test_phase_serde() {
        let yaml = serde_yaml::to_string(&TaskPhase::LimitsInitialized).unwrap();
        assert_eq!(yaml.trim(), "limits_initialized");

        let back: TaskPhase = serde_yaml::from_str("ready").unwrap();
        assert_eq!(back, TaskPhase::Ready);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(TaskPhase::Created.to_string(), "created");
        assert_eq!(TaskPhase::LimitsInitialized.to_string(), "limits_initialized");
    }
}

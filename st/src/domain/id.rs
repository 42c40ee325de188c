//! Task identity
//!
//! A task id names one unit of partitioned work: the topology subgraph
//! (group) it executes and the partition group it is assigned. The text
//! form `<group>_<partition>` appears in state directory names, logs,
//! and checkpoint files, so parsing must accept exactly what Display
//! produces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a single stream-processing task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId {
    /// Topology subgraph this task executes
    pub group: u32,

    /// Partition group assigned to this task
    pub partition: u32,
}

/// Error parsing a task id from its text form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid task id {input:?}, expected <group>_<partition>")]
pub struct TaskIdParseError {
    input: String,
}

impl TaskId {
    pub fn new(group: u32, partition: u32) -> Self {
        Self { group, partition }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.group, self.partition)
    }
}

impl std::str::FromStr for TaskId {
    type Err = TaskIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TaskIdParseError { input: s.to_string() };
        let (group, partition) = s.split_once('_').ok_or_else(err)?;
        Ok(Self {
            group: group.parse().map_err(|_| err())?,
            partition: partition.parse().map_err(|_| err())?,
        })
    }
}

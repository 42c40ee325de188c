//! Domain types
//!
//! Core identity and lifecycle types: TaskId, TopicPartition, TaskPhase.
//! Everything here is a plain value; behavior lives in the task module.

mod id;
mod partition;
mod phase;

pub use id::{TaskId, TaskIdParseError};
pub use partition::TopicPartition;
pub use phase::TaskPhase;

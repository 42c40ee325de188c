//! StreamTask - Lifecycle and Recovery Coordination for Stateful Stream Tasks
//!
//! StreamTask coordinates the lifecycle of a single partitioned
//! stream-processing task: recovering committed offsets into restoration
//! limits, building and registering the task's local state stores,
//! flushing state on commit, and checkpointing offsets on close.
//!
//! # Core Concepts
//!
//! - **Limits Before Stores**: Committed offsets become restoration
//!   limits before any store initializes, so changelog replay never runs
//!   past what the task actually processed
//! - **Explicit Phases**: Every lifecycle operation checks the task's
//!   phase and refuses out-of-order calls instead of corrupting state
//! - **Typed Failures**: Interruption, authorization failures, and store
//!   faults each surface as distinct error variants for the supervisor
//! - **Roles Over One Core**: Active and standby tasks share the same
//!   lifecycle core and differ only in what they commit
//!
//! # Modules
//!
//! - [`task`] - Lifecycle core and the active/standby roles
//! - [`state`] - State manager, state store, and write-back cache traits
//! - [`consumer`] - Committed-offset source abstraction
//! - [`topology`] - Store builders and source topics
//! - [`config`] - Configuration types and loading

pub mod config;
pub mod consumer;
pub mod context;
pub mod domain;
pub mod error;
pub mod state;
pub mod task;
pub mod topology;

// Re-export commonly used types
pub use config::{CommitConfig, StateConfig, TaskConfig};
pub use consumer::{ConsumerError, OffsetConsumer};
pub use context::ProcessorContext;
pub use domain::{TaskId, TaskIdParseError, TaskPhase, TopicPartition};
pub use error::TaskError;
pub use state::{
    NoopCache, StateError, StateManager, StateStore, WriteBackCache, store_changelog_topic,
};
pub use task::{StandbyTask, StreamTask, Task, TaskCore};
pub use topology::{StoreBuilder, Topology};

//! State layer boundaries
//!
//! Traits for the per-task state manager, the stores it owns, and the
//! shared write-back cache. Concrete implementations live in the
//! engine; the task drives their lifecycle through these seams.

mod cache;
pub mod manager;
pub mod store;

pub use cache::{NoopCache, WriteBackCache};
pub use manager::{StateError, StateManager, store_changelog_topic};
pub use store::StateStore;

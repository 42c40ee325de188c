//! Processing topology surface
//!
//! The topology is built once per application and shared read-only by
//! every task. Tasks only consume the state-relevant slice of it: which
//! stores exist (as builders, so each task gets its own instances),
//! which topics feed the graph, and which topic re-materializes each
//! store during restoration.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::state::{StateStore, store_changelog_topic};

/// Builds per-task instances of one declared store
///
/// Store names must be unique within a topology; `build` is called at
/// most once per task.
pub trait StoreBuilder: Send + Sync {
    /// Name of the store this builder produces
    fn name(&self) -> &str;

    /// Build a fresh, unbound store instance
    fn build(&self) -> Arc<dyn StateStore>;
}

/// Read-only processing graph shared by all tasks of an application
#[derive(Default)]
pub struct Topology {
    builders: Vec<Arc<dyn StoreBuilder>>,
    source_topics: BTreeSet<String>,
    source_store_topics: BTreeMap<String, String>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an input topic (builder pattern)
    pub fn with_source_topic(mut self, topic: impl Into<String>) -> Self {
        self.source_topics.insert(topic.into());
        self
    }

    /// Declare a state store (builder pattern)
    pub fn with_store(mut self, builder: Arc<dyn StoreBuilder>) -> Self {
        self.builders.push(builder);
        self
    }

    /// Declare a store materialized directly from a source topic
    ///
    /// Such a store restores from the source topic itself instead of a
    /// dedicated changelog. The topic is also a source of the graph.
    pub fn with_source_store(mut self, store: impl Into<String>, topic: impl Into<String>) -> Self {
        let topic = topic.into();
        self.source_topics.insert(topic.clone());
        self.source_store_topics.insert(store.into(), topic);
        self
    }

    /// Declared store builders, in declaration order
    pub fn store_builders(&self) -> &[Arc<dyn StoreBuilder>] {
        &self.builders
    }

    /// Topics the graph reads from
    pub fn source_topics(&self) -> &BTreeSet<String> {
        &self.source_topics
    }

    /// Names of all declared stores, in declaration order
    pub fn store_names(&self) -> Vec<&str> {
        self.builders.iter().map(|b| b.name()).collect()
    }

    /// Topic a store replays during restoration
    ///
    /// Source-materialized stores replay their source topic; every
    /// other store replays the application's derived changelog.
    pub fn changelog_topic_for(&self, application_id: &str, store: &str) -> String {
        match self.source_store_topics.get(store) {
            Some(topic) => topic.clone(),
            None => store_changelog_topic(application_id, store),
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stores = self.store_names().join(", ");
        let sources: Vec<&str> = self.source_topics.iter().map(String::as_str).collect();
        write!(f, "stores: [{}] sources: [{}]", stores, sources.join(", "))
    }
}

impl std::fmt::Debug for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Topology")
            .field("stores", &self.store_names())
            .field("source_topics", &self.source_topics)
            .finish()
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::state::store::mock::MockStateStore;

    /// Store builder handing out one prebuilt mock instance
    ///
    /// Tests keep their own `Arc` to the store so they can read its
    /// lifecycle counters after the task has taken ownership.
    pub struct MockStoreBuilder {
        store: Arc<MockStateStore>,
    }

    impl MockStoreBuilder {
        pub fn new(store: Arc<MockStateStore>) -> Self {
            Self { store }
        }
    }

    impl StoreBuilder for MockStoreBuilder {
        fn name(&self) -> &str {
            self.store.name()
        }

        fn build(&self) -> Arc<dyn StateStore> {
            Arc::clone(&self.store) as Arc<dyn StateStore>
        }
    }
}

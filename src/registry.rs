//! Process-wide map of resolved terminal instances.
//!
//! The registry starts empty, is replaced wholesale on every configuration
//! load, and emptied on teardown. Readers take a snapshot and keep using it
//! even if a reload swaps in a new set meanwhile; nobody ever sees a partially
//! rebuilt set.

use arc_swap::ArcSwap;
use std::sync::Arc;
use term_profiles_config::TerminalInstance;

/// Atomically swappable set of [`TerminalInstance`]s, in resolution order.
#[derive(Debug)]
pub struct InstanceRegistry {
    instances: ArcSwap<Vec<TerminalInstance>>,
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            instances: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Replace the whole instance set.
    pub fn reload(&self, instances: Vec<TerminalInstance>) {
        log::debug!("Registry reload with {} instance(s)", instances.len());
        self.instances.store(Arc::new(instances));
    }

    /// Drop every instance.
    pub fn clear(&self) {
        self.instances.store(Arc::new(Vec::new()));
    }

    /// Current instance set.
    pub fn snapshot(&self) -> Arc<Vec<TerminalInstance>> {
        self.instances.load_full()
    }

    /// Look up an instance by name in the current set.
    pub fn get(&self, name: &str) -> Option<TerminalInstance> {
        self.instances
            .load()
            .iter()
            .find(|instance| instance.name() == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.instances.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.load().is_empty()
    }
}

//! Host-facing facade tying configuration, catalog and launching together.
//!
//! Lifecycle: [`TerminalProfiles::start`] on startup,
//! [`TerminalProfiles::reload`] whenever the configuration changes,
//! [`TerminalProfiles::stop`] on shutdown. Everything runs synchronously on
//! the caller's thread.

use crate::catalog::{Catalog, CatalogBuilder};
use crate::error::LaunchError;
use crate::icon::IconResolver;
use crate::launch::{Invocation, LaunchMode, ProcessLauncher, dispatch};
use crate::registry::InstanceRegistry;
use term_profiles_config::{InstanceResolver, PluginSettings, SettingsStore, SkippedInstance};

/// The terminal profiles plugin.
#[derive(Debug)]
pub struct TerminalProfiles {
    resolver: InstanceResolver,
    icons: IconResolver,
    registry: InstanceRegistry,
    use_profile_icons: bool,
}

impl TerminalProfiles {
    pub fn new(resolver: InstanceResolver, icons: IconResolver) -> Self {
        Self {
            resolver,
            icons,
            registry: InstanceRegistry::new(),
            use_profile_icons: true,
        }
    }

    /// Load the configuration for the first time.
    pub fn start(&mut self, store: &dyn SettingsStore) -> Vec<SkippedInstance> {
        log::info!("Starting terminal profiles");
        self.load(store)
    }

    /// Re-resolve every instance and swap the new set in.
    pub fn reload(&mut self, store: &dyn SettingsStore) -> Vec<SkippedInstance> {
        log::info!("Configuration changed, reloading terminal instances");
        self.load(store)
    }

    /// Drop all instances. Launches fail with `UnknownInstance` afterwards.
    pub fn stop(&mut self) {
        self.registry.clear();
    }

    fn load(&mut self, store: &dyn SettingsStore) -> Vec<SkippedInstance> {
        let settings = PluginSettings::new(store);
        self.use_profile_icons = settings.use_profile_icons();
        let resolution = self.resolver.resolve(&settings);
        self.registry.reload(resolution.instances);
        resolution.skipped
    }

    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }

    /// Build the catalog from the current instance set.
    pub fn catalog(&self) -> Catalog {
        CatalogBuilder::new(&self.icons)
            .use_profile_icons(self.use_profile_icons)
            .build(&self.registry.snapshot())
    }

    /// The invocation an action on `target` would run.
    ///
    /// `action` is the host action name; `None` is the default action.
    pub fn invocation(&self, target: &str, action: Option<&str>) -> Result<Invocation, LaunchError> {
        dispatch(&self.registry, target, LaunchMode::from_action_name(action))
    }

    /// Run an action on `target` through `launcher`.
    pub fn execute(
        &self,
        target: &str,
        action: Option<&str>,
        launcher: &dyn ProcessLauncher,
    ) -> Result<(), LaunchError> {
        let invocation = self.invocation(target, action)?;
        launcher.launch(&invocation)
    }
}

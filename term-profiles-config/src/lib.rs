//! Configuration system for term-profiles.
//!
//! This crate turns the plugin configuration into the set of terminal
//! instances whose profiles are exposed as catalog items. It includes:
//!
//! - A typed settings interface over key/value sections ([`SettingsStore`])
//! - The TOML-backed store and an in-memory store for embedders and tests
//! - Package path templates and path existence checks
//! - Environment variable expansion for user supplied paths
//! - Instance resolution with per-instance failure isolation
//! - Configuration file watching

pub mod env_vars;
pub mod error;
pub mod instance;
pub mod paths;
pub mod resolver;
pub mod settings;
pub mod store;
#[cfg(feature = "watcher")]
pub mod watcher;

pub use env_vars::expand_env_vars;
pub use error::{ConfigError, InstanceError};
pub use instance::{INSTANCE_SEPARATOR, TerminalInstance, validate_instance_name};
pub use paths::PackagePaths;
pub use resolver::{InstanceResolver, Resolution, SkippedInstance};
pub use settings::{
    DEFAULT_DISPLAY_NAME, INSTANCE_SECTION_PREFIX, InstanceKey, InstanceSection, ItemsKey,
    PluginSettings,
};
pub use store::{DEFAULT_CONFIG, MemorySettings, SettingsStore, TomlSettings, default_config_path};

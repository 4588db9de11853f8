//! Typed error variants for the term-profiles-config crate.
//!
//! [`ConfigError`] covers the configuration file as a whole. [`InstanceError`]
//! covers a single `terminal/<name>` section: it never aborts resolution of the
//! other instances, it only excludes the one it names.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading the plugin configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading the config file.
    #[error("I/O error reading config '{}': {source}", .path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained invalid TOML.
    #[error("TOML parse error in config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Reasons a configured terminal instance is excluded from resolution.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// A custom (non-packaged) instance is missing one of its mandatory paths.
    #[error(
        "Config section [{section}] defines a custom installation, but the value for '{key}' is missing"
    )]
    MissingRequiredPath {
        /// Full section name, e.g. `terminal/portable`.
        section: String,
        /// The missing key (`settings_file` or `executable`).
        key: &'static str,
    },

    /// The app package named by `app_package` is not installed.
    #[error("Skipping '{instance}', package {package} does not exist")]
    PackageNotFound {
        /// Instance name.
        instance: String,
        /// Package family name.
        package: String,
    },

    /// The instance name cannot be encoded into an item target.
    #[error("Invalid instance name '{name}': {reason}")]
    InvalidInstanceName {
        /// Offending instance name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// The settings document does not exist.
    #[error("Could not find Windows Terminal settings at {}", .0.display())]
    SettingsNotFound(PathBuf),

    /// The terminal executable does not exist.
    #[error("Could not find Windows Terminal at {}", .0.display())]
    ExecutableNotFound(PathBuf),
}

impl InstanceError {
    /// Log level this error is reported at.
    ///
    /// A missing optional package is normal on most machines, so it is only
    /// informational. Everything else points at a configuration mistake.
    pub fn level(&self) -> log::Level {
        match self {
            InstanceError::PackageNotFound { .. } => log::Level::Info,
            _ => log::Level::Warn,
        }
    }
}

//! Typed error types for term-profiles.
//!
//! Profile and icon errors are isolated per instance / per item: the catalog
//! build logs them and carries on. Launch errors are returned to whoever asked
//! for the launch.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading profiles out of one instance's settings document.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The settings document could not be read.
    #[error("Failed to read settings '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not valid text in any detected encoding.
    #[error("Settings document is not valid {encoding} text")]
    Decode {
        /// Name of the encoding that was tried last.
        encoding: &'static str,
    },

    /// The document is not valid (relaxed) JSON, or `profiles` has an
    /// unexpected shape.
    #[error("Malformed settings document: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    /// A profile entry lacks a `guid` or a `name`.
    #[error("Skipping invalid profile with name:'{name}' guid:'{guid}'")]
    InvalidProfile { name: String, guid: String },
}

/// Errors resolving or loading a profile icon.
///
/// Never surfaced to the user: every variant means "no icon".
#[derive(Debug, Error)]
pub enum IconError {
    /// No bundled resource exists for the icon key.
    #[error("Bundled icon '{0}' not found")]
    BundledNotFound(String),

    /// The icon cache directory could not be created.
    #[error("Cannot create icon cache '{}': {source}", .path.display())]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external icon file could not be copied into the cache.
    #[error("Cannot copy icon '{}' to cache: {source}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The icon loader rejected the resource.
    #[error("Cannot load icon '{resource}': {reason}")]
    Load { resource: String, reason: String },
}

/// Errors turning an item target into a process launch.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The target names an instance that is not (or no longer) configured.
    #[error("Unknown terminal instance '{0}'")]
    UnknownInstance(String),

    /// The target does not contain the instance separator.
    #[error("Malformed item target '{0}'")]
    MalformedTarget(String),

    /// Elevated launches need a platform with a "run as" verb.
    #[error("Elevated launch is not supported on this platform")]
    ElevationUnsupported,

    /// The process could not be started.
    #[error("Failed to launch '{}': {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

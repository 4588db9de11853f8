//! A resolved terminal installation.

use crate::error::InstanceError;
use crate::paths::exists_or_is_link;
use std::path::{Path, PathBuf};

/// Separator between instance name and profile GUID in an item target.
///
/// Instance names containing it are rejected, so a target always splits back
/// into the pair it was built from.
pub const INSTANCE_SEPARATOR: &str = "::";

/// Check that `name` can be used as an instance name.
pub fn validate_instance_name(name: &str) -> Result<(), InstanceError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains(INSTANCE_SEPARATOR) {
        "name contains the reserved separator '::'"
    } else if name.ends_with(':') {
        "name ends with ':' and would run into the separator"
    } else {
        return Ok(());
    };
    Err(InstanceError::InvalidInstanceName {
        name: name.to_string(),
        reason,
    })
}

/// One configured terminal installation.
///
/// Immutable once built; a configuration reload builds a fresh set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalInstance {
    name: String,
    display_prefix: String,
    settings_path: PathBuf,
    executable_path: PathBuf,
}

impl TerminalInstance {
    /// Build an instance, checking the name and that both paths exist.
    pub fn new(
        name: impl Into<String>,
        display_prefix: impl Into<String>,
        settings_path: impl Into<PathBuf>,
        executable_path: impl Into<PathBuf>,
    ) -> Result<Self, InstanceError> {
        let name = name.into();
        let settings_path = settings_path.into();
        let executable_path = executable_path.into();

        validate_instance_name(&name)?;
        if !settings_path.exists() {
            return Err(InstanceError::SettingsNotFound(settings_path));
        }
        if !exists_or_is_link(&executable_path) {
            return Err(InstanceError::ExecutableNotFound(executable_path));
        }

        Ok(Self {
            name,
            display_prefix: display_prefix.into(),
            settings_path,
            executable_path,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prepended to every profile label of this instance.
    pub fn display_prefix(&self) -> &str {
        &self.display_prefix
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }
}

//! Turns the plugin configuration into the set of enabled terminal instances.
//!
//! Each `terminal/<name>` section is resolved on its own: a section that is
//! misconfigured, or that points at a package that is not installed, is
//! reported and skipped without affecting its siblings.

use crate::env_vars::expand_env_vars;
use crate::error::InstanceError;
use crate::instance::{TerminalInstance, validate_instance_name};
use crate::paths::{PackagePaths, local_app_data_dir};
use crate::settings::{InstanceKey, InstanceSection, PluginSettings};
use std::path::PathBuf;

/// An instance section that did not produce a [`TerminalInstance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedInstance {
    /// Instance name (section name without the prefix).
    pub name: String,
    pub error: InstanceError,
}

/// Outcome of resolving all instance sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Resolved instances, in config section order.
    pub instances: Vec<TerminalInstance>,
    /// Sections that were excluded, with the reason. Disabled sections are
    /// not listed here.
    pub skipped: Vec<SkippedInstance>,
}

/// Resolves `terminal/<name>` sections into [`TerminalInstance`]s.
#[derive(Debug, Clone)]
pub struct InstanceResolver {
    local_app_data: PathBuf,
}

impl Default for InstanceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceResolver {
    /// Create a resolver rooted at the user's local application data dir.
    pub fn new() -> Self {
        Self {
            local_app_data: local_app_data_dir(),
        }
    }

    /// Use a different `%LOCALAPPDATA%` root for package path templates.
    pub fn with_local_app_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_app_data = path.into();
        self
    }

    /// Resolve every enabled instance section.
    pub fn resolve(&self, settings: &PluginSettings<'_>) -> Resolution {
        let mut resolution = Resolution::default();

        for section in settings.instance_sections() {
            if !section.enabled {
                log::debug!("Instance '{}' is disabled, skipping", section.name);
                continue;
            }

            match self.resolve_section(&section) {
                Ok(instance) => resolution.instances.push(instance),
                Err(error) => {
                    log::log!(error.level(), "{error}");
                    resolution.skipped.push(SkippedInstance {
                        name: section.name,
                        error,
                    });
                }
            }
        }

        log::info!(
            "Resolved {} terminal instance(s), skipped {}",
            resolution.instances.len(),
            resolution.skipped.len()
        );
        resolution
    }

    fn resolve_section(&self, section: &InstanceSection) -> Result<TerminalInstance, InstanceError> {
        validate_instance_name(&section.name)?;

        // For packaged instances, paths are derived from the package id...
        let packaged = match section.app_package.as_deref() {
            Some(package) => {
                let paths = PackagePaths::derive(&self.local_app_data, package);
                if !paths.is_installed() {
                    return Err(InstanceError::PackageNotFound {
                        instance: section.name.clone(),
                        package: package.to_string(),
                    });
                }
                Some(paths)
            }
            None => None,
        };

        // ...but explicit paths always win.
        let settings_file = section
            .settings_file
            .as_deref()
            .map(|p| PathBuf::from(expand_env_vars(p)))
            .or_else(|| packaged.as_ref().map(|p| p.settings_file.clone()));
        let executable = section
            .executable
            .as_deref()
            .map(|p| PathBuf::from(expand_env_vars(p)))
            .or_else(|| packaged.as_ref().map(|p| p.executable.clone()));

        let settings_file = settings_file.ok_or_else(|| missing(section, InstanceKey::SettingsFile))?;
        let executable = executable.ok_or_else(|| missing(section, InstanceKey::Executable))?;

        log::info!(
            "Adding profiles for '{}' ({})",
            section.name,
            section.app_package.as_deref().unwrap_or("custom")
        );
        TerminalInstance::new(&section.name, &section.prefix, settings_file, executable)
    }
}

fn missing(section: &InstanceSection, key: InstanceKey) -> InstanceError {
    InstanceError::MissingRequiredPath {
        section: section.section.clone(),
        key: key.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySettings;
    use tempfile::TempDir;

    fn install_package(root: &std::path::Path, package: &str) -> PackagePaths {
        let paths = PackagePaths::derive(root, package);
        std::fs::create_dir_all(&paths.install_dir).unwrap();
        std::fs::create_dir_all(paths.settings_file.parent().unwrap()).unwrap();
        std::fs::write(&paths.settings_file, "{}").unwrap();
        std::fs::write(&paths.executable, "").unwrap();
        paths
    }

    #[test]
    fn test_packaged_instance_uses_derived_paths() {
        let temp = TempDir::new().unwrap();
        let paths = install_package(temp.path(), "Foo.Package");
        let store = MemorySettings::new().section("terminal/stable", [("app_package", "Foo.Package")]);

        let resolution = InstanceResolver::new()
            .with_local_app_data(temp.path())
            .resolve(&PluginSettings::new(&store));

        assert!(resolution.skipped.is_empty());
        assert_eq!(resolution.instances.len(), 1);
        let instance = &resolution.instances[0];
        assert_eq!(instance.name(), "stable");
        assert_eq!(instance.display_prefix(), "Windows Terminal (stable): ");
        assert_eq!(instance.settings_path(), paths.settings_file.as_path());
        assert_eq!(instance.executable_path(), paths.executable.as_path());
    }

    #[test]
    fn test_missing_package_is_informational_skip() {
        let temp = TempDir::new().unwrap();
        let store = MemorySettings::new().section("terminal/beta", [("app_package", "Foo.Package")]);

        let resolution = InstanceResolver::new()
            .with_local_app_data(temp.path())
            .resolve(&PluginSettings::new(&store));

        assert!(resolution.instances.is_empty());
        assert_eq!(resolution.skipped.len(), 1);
        assert_eq!(resolution.skipped[0].name, "beta");
        assert_eq!(resolution.skipped[0].error.level(), log::Level::Info);
    }

    #[test]
    fn test_override_wins_over_package() {
        let temp = TempDir::new().unwrap();
        install_package(temp.path(), "Foo.Package");
        let custom = temp.path().join("custom.json");
        std::fs::write(&custom, "{}").unwrap();
        let store = MemorySettings::new().section(
            "terminal/stable",
            [
                ("app_package", "Foo.Package"),
                ("settings_file", custom.to_str().unwrap()),
            ],
        );

        let resolution = InstanceResolver::new()
            .with_local_app_data(temp.path())
            .resolve(&PluginSettings::new(&store));

        assert_eq!(resolution.instances[0].settings_path(), custom.as_path());
    }

    #[test]
    fn test_custom_instance_requires_both_paths() {
        let temp = TempDir::new().unwrap();
        let settings = temp.path().join("settings.json");
        std::fs::write(&settings, "{}").unwrap();
        let store = MemorySettings::new()
            .section("terminal/nosettings", [("executable", "wt.exe")])
            .section("terminal/noexe", [("settings_file", settings.to_str().unwrap())]);

        let resolution = InstanceResolver::new()
            .with_local_app_data(temp.path())
            .resolve(&PluginSettings::new(&store));

        assert!(resolution.instances.is_empty());
        assert_eq!(
            resolution.skipped[0].error,
            InstanceError::MissingRequiredPath {
                section: "terminal/nosettings".to_string(),
                key: "settings_file",
            }
        );
        assert_eq!(
            resolution.skipped[1].error,
            InstanceError::MissingRequiredPath {
                section: "terminal/noexe".to_string(),
                key: "executable",
            }
        );
    }

    #[test]
    fn test_disabled_instance_not_reported() {
        let temp = TempDir::new().unwrap();
        install_package(temp.path(), "Foo.Package");
        let store = MemorySettings::new()
            .section("terminal/stable", [("app_package", "Foo.Package"), ("enabled", "false")]);

        let resolution = InstanceResolver::new()
            .with_local_app_data(temp.path())
            .resolve(&PluginSettings::new(&store));

        assert_eq!(resolution, Resolution::default());
    }

    #[test]
    fn test_separator_in_name_rejected() {
        let temp = TempDir::new().unwrap();
        install_package(temp.path(), "Foo.Package");
        let store = MemorySettings::new().section("terminal/a::b", [("app_package", "Foo.Package")]);

        let resolution = InstanceResolver::new()
            .with_local_app_data(temp.path())
            .resolve(&PluginSettings::new(&store));

        assert!(resolution.instances.is_empty());
        assert!(matches!(
            resolution.skipped[0].error,
            InstanceError::InvalidInstanceName { .. }
        ));
    }
}

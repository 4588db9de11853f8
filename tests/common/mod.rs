//! Shared integration test helpers for term-profiles.
//!
//! Include this module at the top of each test file that needs it:
//!
//! ```ignore
//! mod common;
//! use common::Fixture;
//! ```
//!
//! The `#[allow(dead_code)]` attribute suppresses warnings when only a subset
//! of helpers is used per file.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use term_profiles::icon::{FsIconLoader, IconResolver};
use term_profiles::plugin::TerminalProfiles;
use term_profiles_config::{InstanceResolver, MemorySettings};

/// A temporary tree holding terminal installs, bundled icons and an icon cache.
///
/// The `TempDir` is removed when the fixture is dropped.
pub struct Fixture {
    pub temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp.path().join("resources")).unwrap();
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn resources(&self) -> PathBuf {
        self.root().join("resources")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root().join("cache")
    }

    /// Place a bundled icon file in the resource directory.
    pub fn bundle_icon(&self, file: &str) {
        fs::write(self.resources().join(file), b"png").unwrap();
    }

    /// Create `<root>/<name>/settings.json` and `<root>/<name>/wt.exe`.
    ///
    /// Returns `(settings, executable)`.
    pub fn install(&self, name: &str, settings_json: &[u8]) -> (PathBuf, PathBuf) {
        let dir = self.root().join(name);
        fs::create_dir_all(&dir).unwrap();
        let settings = dir.join("settings.json");
        let exe = dir.join("wt.exe");
        fs::write(&settings, settings_json).unwrap();
        fs::write(&exe, b"").unwrap();
        (settings, exe)
    }

    /// Overwrite an install's settings document.
    pub fn rewrite(&self, name: &str, settings_json: &[u8]) {
        fs::write(self.root().join(name).join("settings.json"), settings_json).unwrap();
    }

    /// An instance section with explicit paths for an install.
    pub fn explicit_section(
        &self,
        store: MemorySettings,
        name: &str,
        prefix: &str,
    ) -> MemorySettings {
        let dir = self.root().join(name);
        store.section(
            format!("terminal/{name}"),
            [
                ("prefix", prefix.to_string()),
                ("settings_file", dir.join("settings.json").display().to_string()),
                ("executable", dir.join("wt.exe").display().to_string()),
            ],
        )
    }

    pub fn icon_resolver(&self) -> IconResolver {
        IconResolver::new(FsIconLoader::new(self.resources()), self.cache_dir())
    }

    /// A plugin whose `%LOCALAPPDATA%` is `<root>/localappdata`.
    pub fn plugin(&self) -> TerminalProfiles {
        TerminalProfiles::new(
            InstanceResolver::new().with_local_app_data(self.root().join("localappdata")),
            self.icon_resolver(),
        )
    }
}

/// A settings document in list form with the given `(guid, name)` profiles.
pub fn profiles_json(profiles: &[(&str, &str)]) -> Vec<u8> {
    let list: Vec<String> = profiles
        .iter()
        .map(|(guid, name)| format!(r#"{{ "guid": "{guid}", "name": "{name}" }}"#))
        .collect();
    format!(r#"{{ "profiles": [ {} ] }}"#, list.join(", ")).into_bytes()
}

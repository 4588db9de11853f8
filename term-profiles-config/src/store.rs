//! Key/value section storage backing the plugin configuration.
//!
//! The core never reads the store directly; [`crate::PluginSettings`] wraps it
//! and exposes only the enumerated keys. Sections are reported in document
//! order, which fixes the order instances (and therefore catalog items) are
//! produced in.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Built-in configuration used when no config file exists.
pub const DEFAULT_CONFIG: &str = r#"[items]
# Load per-profile icons (built-in, ms-appx:// and external files)
use_profile_icons = true

["terminal/stable"]
app_package = "Microsoft.WindowsTerminal_8wekyb3d8bbwe"

["terminal/preview"]
app_package = "Microsoft.WindowsTerminalPreview_8wekyb3d8bbwe"
"#;

/// Read access to a sectioned key/value configuration.
pub trait SettingsStore {
    /// Section names in document order.
    fn sections(&self) -> Vec<String>;

    /// Raw string value of `key` in `section`, if present.
    fn get_str(&self, section: &str, key: &str) -> Option<String>;

    /// Boolean value of `key` in `section`.
    ///
    /// `None` when the key is absent or its value is not a recognisable boolean.
    fn get_bool(&self, section: &str, key: &str) -> Option<bool>;
}

/// Parse a boolean written as a string (`yes`, `off`, `1`, ...).
pub(crate) fn parse_bool_str(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Get the default config file path (`<config dir>/term-profiles/config.toml`).
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("term-profiles")
        .join("config.toml")
}

/// TOML-backed settings store.
///
/// Every top-level table is a section; scalar top-level keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct TomlSettings {
    table: Table,
}

impl TomlSettings {
    /// Parse settings from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let table: Table = toml::from_str(text)?;
        Ok(Self { table })
    }

    /// Load settings from a file.
    ///
    /// A missing file falls back to [`DEFAULT_CONFIG`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!(
                "No config file found at {}, using built-in defaults",
                path.display()
            );
            return Self::parse(DEFAULT_CONFIG);
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {} ({} bytes)", path.display(), text.len());
        Self::parse(&text)
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.table.get(section)?.as_table()?.get(key)
    }
}

impl SettingsStore for TomlSettings {
    fn sections(&self) -> Vec<String> {
        self.table
            .iter()
            .filter(|(_, v)| v.is_table())
            .map(|(k, _)| k.clone())
            .collect()
    }

    fn get_str(&self, section: &str, key: &str) -> Option<String> {
        match self.value(section, key)? {
            Value::String(s) => Some(s.clone()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }

    fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        match self.value(section, key)? {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::String(s) => parse_bool_str(s),
            _ => None,
        }
    }
}

/// In-memory settings store.
///
/// Sections keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl MemorySettings {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or extend) a section with the given key/value pairs.
    pub fn section<I, K, V>(mut self, name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into()));
        match self.sections.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(entries),
            None => self.sections.push((name, entries.collect())),
        }
        self
    }
}

impl SettingsStore for MemorySettings {
    fn sections(&self) -> Vec<String> {
        self.sections.iter().map(|(n, _)| n.clone()).collect()
    }

    fn get_str(&self, section: &str, key: &str) -> Option<String> {
        self.sections
            .iter()
            .find(|(n, _)| n == section)?
            .1
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    fn get_bool(&self, section: &str, key: &str) -> Option<bool> {
        parse_bool_str(&self.get_str(section, key)?)
    }
}

//! Typed view over the plugin configuration.
//!
//! Only the keys enumerated here are ever read. Every accessor documents its
//! fallback value, so the resolver never deals with missing keys itself.

use crate::store::SettingsStore;

/// Section prefix that marks a terminal instance, e.g. `terminal/stable`.
pub const INSTANCE_SECTION_PREFIX: &str = "terminal/";

/// Display name used to build the default item prefix.
pub const DEFAULT_DISPLAY_NAME: &str = "Windows Terminal";

const ITEMS_SECTION: &str = "items";

/// Keys recognised in the `[items]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsKey {
    /// Load per-profile icons (default `true`).
    UseProfileIcons,
}

impl ItemsKey {
    /// Key name as written in the config file.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemsKey::UseProfileIcons => "use_profile_icons",
        }
    }
}

/// Keys recognised in a `terminal/<name>` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceKey {
    /// Whether the instance is listed (default `true`).
    Enabled,
    /// Label prefix for every profile of the instance.
    Prefix,
    /// App package family name; derives default paths.
    AppPackage,
    /// Explicit settings document path.
    SettingsFile,
    /// Explicit terminal executable path.
    Executable,
}

impl InstanceKey {
    /// Key name as written in the config file.
    pub fn as_str(self) -> &'static str {
        match self {
            InstanceKey::Enabled => "enabled",
            InstanceKey::Prefix => "prefix",
            InstanceKey::AppPackage => "app_package",
            InstanceKey::SettingsFile => "settings_file",
            InstanceKey::Executable => "executable",
        }
    }
}

/// Everything the resolver needs from one instance section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSection {
    /// Full section name, e.g. `terminal/stable`.
    pub section: String,
    /// Instance name: the section name without the prefix.
    pub name: String,
    pub enabled: bool,
    /// Item label prefix, already defaulted.
    pub prefix: String,
    pub app_package: Option<String>,
    pub settings_file: Option<String>,
    pub executable: Option<String>,
}

/// Typed wrapper for the plugin configuration.
pub struct PluginSettings<'a> {
    store: &'a dyn SettingsStore,
}

impl<'a> PluginSettings<'a> {
    pub fn new(store: &'a dyn SettingsStore) -> Self {
        Self { store }
    }

    /// True if per-profile icons should be loaded. Defaults to `true`.
    pub fn use_profile_icons(&self) -> bool {
        self.bool_or(ITEMS_SECTION, ItemsKey::UseProfileIcons.as_str(), true)
    }

    /// All `terminal/<name>` sections, in document order.
    ///
    /// The prefix is matched case-insensitively; the instance name keeps the
    /// case it was written with.
    pub fn instance_sections(&self) -> Vec<InstanceSection> {
        self.store
            .sections()
            .into_iter()
            .filter_map(|section| {
                let name = strip_prefix_ignore_case(&section, INSTANCE_SECTION_PREFIX)?;
                let name = name.to_string();
                Some(self.read_instance(section, name))
            })
            .collect()
    }

    fn read_instance(&self, section: String, name: String) -> InstanceSection {
        let enabled = self.bool_or(&section, InstanceKey::Enabled.as_str(), true);
        let prefix = self
            .string(&section, InstanceKey::Prefix)
            .unwrap_or_else(|| default_prefix(&name));
        InstanceSection {
            enabled,
            prefix,
            app_package: self.string(&section, InstanceKey::AppPackage),
            settings_file: self.string(&section, InstanceKey::SettingsFile),
            executable: self.string(&section, InstanceKey::Executable),
            section,
            name,
        }
    }

    /// Unquoted value; blank strings count as absent.
    ///
    /// Prefixes keep their whitespace (`"Dev: "` ends in a space on purpose),
    /// everything else is trimmed.
    fn string(&self, section: &str, key: InstanceKey) -> Option<String> {
        let raw = self.store.get_str(section, key.as_str())?;
        let value = match key {
            InstanceKey::Prefix => unquote(&raw),
            _ => unquote(raw.trim()),
        };
        (!value.trim().is_empty()).then(|| value.to_string())
    }

    fn bool_or(&self, section: &str, key: &str, fallback: bool) -> bool {
        match self.store.get_bool(section, key) {
            Some(value) => value,
            None => {
                if self.store.get_str(section, key).is_some() {
                    log::warn!(
                        "Config value [{section}] {key} is not a boolean, using {fallback}"
                    );
                }
                fallback
            }
        }
    }
}

/// Default label prefix: `"<DisplayName> (<instance>): "`.
pub fn default_prefix(instance_name: &str) -> String {
    format!("{DEFAULT_DISPLAY_NAME} ({instance_name}): ")
}

fn strip_prefix_ignore_case<'s>(s: &'s str, prefix: &str) -> Option<&'s str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

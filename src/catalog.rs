//! Catalog items built from every instance's profiles.
//!
//! Item order is instance order (config section order), then profile order
//! within each settings document. Rebuilding from unchanged inputs yields the
//! same items in the same order.

use crate::icon::{IconRef, IconResolver};
use crate::profile::{Profile, load_profiles};
use term_profiles_config::{INSTANCE_SEPARATOR, TerminalInstance};

/// Short description shown under every item.
pub const ITEM_SHORT_DESC: &str = "Open a new terminal";

/// The `(instance, profile GUID)` pair an item launches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemTarget {
    pub instance: String,
    pub guid: String,
}

impl ItemTarget {
    pub fn new(instance: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            guid: guid.into(),
        }
    }

    /// `<instance>::<guid>`
    pub fn encode(&self) -> String {
        format!("{}{INSTANCE_SEPARATOR}{}", self.instance, self.guid)
    }

    /// Split a target at the first separator.
    ///
    /// Returns `None` when the separator is missing.
    pub fn decode(target: &str) -> Option<Self> {
        let (instance, guid) = target.split_once(INSTANCE_SEPARATOR)?;
        Some(Self::new(instance, guid))
    }
}

impl std::fmt::Display for ItemTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

/// A launchable entry surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Instance prefix + profile name.
    pub label: String,
    pub short_desc: String,
    /// Encoded [`ItemTarget`].
    pub target: String,
    pub icon: Option<IconRef>,
}

/// A complete catalog: items plus the icon for items without their own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub default_icon: Option<IconRef>,
    pub items: Vec<CatalogItem>,
}

/// Composes profile parsing and icon resolution over a set of instances.
#[derive(Debug)]
pub struct CatalogBuilder<'a> {
    icons: &'a IconResolver,
    use_profile_icons: bool,
}

impl<'a> CatalogBuilder<'a> {
    pub fn new(icons: &'a IconResolver) -> Self {
        Self {
            icons,
            use_profile_icons: true,
        }
    }

    /// Whether per-profile icons are resolved at all.
    pub fn use_profile_icons(mut self, enabled: bool) -> Self {
        self.use_profile_icons = enabled;
        self
    }

    /// Build the catalog for `instances`.
    ///
    /// Never fails: an instance whose settings cannot be read or parsed
    /// contributes no items, and invalid profiles are skipped.
    pub fn build(&self, instances: &[TerminalInstance]) -> Catalog {
        let items: Vec<CatalogItem> = instances
            .iter()
            .flat_map(|instance| self.items_for_instance(instance))
            .collect();

        log::info!(
            "Built catalog with {} item(s) from {} instance(s)",
            items.len(),
            instances.len()
        );
        Catalog {
            default_icon: self.icons.default_icon(),
            items,
        }
    }

    fn items_for_instance(&self, instance: &TerminalInstance) -> Vec<CatalogItem> {
        let entries = match load_profiles(instance.settings_path()) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot read profiles for '{}': {e}", instance.name());
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|entry| match entry.validate() {
                Ok(profile) => Some(self.item_for_profile(instance, &profile)),
                Err(e) => {
                    log::warn!("{e}");
                    None
                }
            })
            .collect()
    }

    fn item_for_profile(&self, instance: &TerminalInstance, profile: &Profile) -> CatalogItem {
        let icon = if self.use_profile_icons {
            self.icons
                .resolve(profile.icon.as_deref(), instance.name(), &profile.guid)
        } else {
            None
        };

        CatalogItem {
            label: format!("{}{}", instance.display_prefix(), profile.name),
            short_desc: ITEM_SHORT_DESC.to_string(),
            target: ItemTarget::new(instance.name(), &profile.guid).encode(),
            icon,
        }
    }
}

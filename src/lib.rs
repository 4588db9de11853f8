// Library exports for the term-profiles binary and integration tests.
//
// Configuration, instance resolution and config-file watching live in the
// `term-profiles-config` crate; this crate owns profile parsing, icons, the
// catalog and launching.

/// Application version (root crate version).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod catalog;
pub mod cli;
pub mod debug;
pub mod error;
pub mod icon;
pub mod launch;
pub mod plugin;
pub mod profile;
pub mod registry;
pub mod relaxed_json;

pub use catalog::{Catalog, CatalogBuilder, CatalogItem, ItemTarget};
pub use error::{IconError, LaunchError, ProfileError};
pub use icon::{FsIconLoader, IconLoader, IconRef, IconResolver};
pub use launch::{Invocation, LaunchMode, ProcessLauncher, SystemLauncher, dispatch};
pub use plugin::TerminalProfiles;
pub use profile::Profile;
pub use profile::parser::{load_profiles, parse_profiles, parse_profiles_str};
pub use registry::InstanceRegistry;

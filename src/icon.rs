//! Profile icon resolution.
//!
//! A profile's icon can come from three places:
//!
//! - nowhere: built-in profiles carry no `icon`, but their brace-wrapped GUID
//!   has a matching icon bundled with the plugin;
//! - `ms-appx:///ProfileIcons/<id>.png`: an icon shipped inside the Windows
//!   Terminal package, for which a bundled copy exists as well;
//! - anything else: an external file (`file:///` URI or a path with
//!   environment variables). The icon loader only reads from the plugin's own
//!   locations, so external files are copied into the icon cache first,
//!   one subdirectory per instance: two installs can give the same profile
//!   GUID different icons.
//!
//! Any failure means "no icon". It is logged and never stops the catalog.

use crate::error::IconError;
use std::fs;
use std::path::{Path, PathBuf};
use term_profiles_config::expand_env_vars;

/// URI prefix of icons shipped inside the terminal package.
pub const INTERNAL_ICON_PREFIX: &str = "ms-appx:///ProfileIcons/";
const INTERNAL_ICON_SUFFIX: &str = ".png";

/// Bundled profile icons are stored as `<key>.scale-200.png`.
pub const ICON_POSTFIX: &str = ".scale-200.png";

/// Bundled application icon, used for items without an icon of their own.
pub const DEFAULT_ICON_FILE: &str = "WindowsTerminal.png";

/// Subdirectory of the cache root holding copied external icons.
pub const ICON_CACHE_SUBDIR: &str = "icons";

#[cfg(windows)]
const FILE_URI_PREFIX: &str = "file:///";
// Keep the leading slash of the absolute path on Unix.
#[cfg(not(windows))]
const FILE_URI_PREFIX: &str = "file://";

/// A resolved, loadable icon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IconRef {
    /// The bundled application icon.
    Default,
    /// A bundled profile icon, keyed by GUID or internal icon id.
    Bundled(String),
    /// An external icon copied into the icon cache.
    Cached(PathBuf),
}

impl IconRef {
    /// File name of a bundled icon inside the resource directory.
    pub fn resource_file(&self) -> Option<String> {
        match self {
            IconRef::Default => Some(DEFAULT_ICON_FILE.to_string()),
            IconRef::Bundled(key) => Some(format!("{key}{ICON_POSTFIX}")),
            IconRef::Cached(_) => None,
        }
    }
}

impl std::fmt::Display for IconRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconRef::Default => write!(f, "res://{DEFAULT_ICON_FILE}"),
            IconRef::Bundled(key) => write!(f, "res://{key}{ICON_POSTFIX}"),
            IconRef::Cached(path) => write!(f, "cache://{}", path.display()),
        }
    }
}

/// Boundary to the icon-loading subsystem.
pub trait IconLoader: Send + Sync {
    /// Load (or check that the host can load) `icon`.
    fn load(&self, icon: &IconRef) -> Result<(), IconError>;
}

/// Loads bundled icons from a resource directory and cached icons from disk.
#[derive(Debug, Clone)]
pub struct FsIconLoader {
    resource_dir: PathBuf,
}

impl FsIconLoader {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
        }
    }

    /// `<executable dir>/resources`, or `./resources` if the executable path
    /// is unknown.
    pub fn default_resource_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("resources")))
            .unwrap_or_else(|| PathBuf::from("resources"))
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }
}

impl IconLoader for FsIconLoader {
    fn load(&self, icon: &IconRef) -> Result<(), IconError> {
        match icon {
            IconRef::Default | IconRef::Bundled(_) => {
                let file = icon.resource_file().unwrap_or_default();
                if self.resource_dir.join(&file).is_file() {
                    Ok(())
                } else {
                    Err(IconError::BundledNotFound(file))
                }
            }
            IconRef::Cached(path) => {
                if path.is_file() {
                    Ok(())
                } else {
                    Err(IconError::Load {
                        resource: icon.to_string(),
                        reason: "not a readable file".to_string(),
                    })
                }
            }
        }
    }
}

/// Decides which icon a profile gets.
pub struct IconResolver {
    loader: Box<dyn IconLoader>,
    cache_dir: PathBuf,
}

impl std::fmt::Debug for IconResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconResolver")
            .field("cache_dir", &self.cache_dir)
            .finish_non_exhaustive()
    }
}

impl IconResolver {
    /// `cache_dir` receives copies of external icon files.
    pub fn new(loader: impl IconLoader + 'static, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader: Box::new(loader),
            cache_dir: cache_dir.into(),
        }
    }

    /// `<cache dir>/term-profiles`
    pub fn default_cache_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("term-profiles")
    }

    /// Icon cache directory under a cache root.
    pub fn icon_cache_dir(cache_root: &Path) -> PathBuf {
        cache_root.join(ICON_CACHE_SUBDIR)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// The application icon, if it can be loaded.
    pub fn default_icon(&self) -> Option<IconRef> {
        match self.loader.load(&IconRef::Default) {
            Ok(()) => Some(IconRef::Default),
            Err(e) => {
                log::warn!("Cannot load default icon: {e}");
                None
            }
        }
    }

    /// Resolve the icon for profile `guid` of `instance`.
    ///
    /// External files are copied on every call, so a file that failed to copy
    /// (or changed) is picked up on the next catalog rebuild.
    pub fn resolve(&self, descriptor: Option<&str>, instance: &str, guid: &str) -> Option<IconRef> {
        let descriptor = descriptor.unwrap_or_default();
        match self.try_resolve(descriptor, instance, guid) {
            Ok(icon) => icon,
            Err(e) => {
                log::warn!("Cannot load icon '{descriptor}' for profile {instance}::{guid}: {e}");
                None
            }
        }
    }

    fn try_resolve(
        &self,
        descriptor: &str,
        instance: &str,
        guid: &str,
    ) -> Result<Option<IconRef>, IconError> {
        if descriptor.is_empty() {
            // Built-in profiles have no icon but a well-known GUID.
            if !is_braced_guid(guid) {
                return Ok(None);
            }
            return self.checked(IconRef::Bundled(guid.to_string())).map(Some);
        }

        if let Some(rest) = descriptor.strip_prefix(INTERNAL_ICON_PREFIX) {
            let id = rest.strip_suffix(INTERNAL_ICON_SUFFIX).unwrap_or(rest);
            return self.checked(IconRef::Bundled(id.to_string())).map(Some);
        }

        let cached = self.copy_to_cache(&external_source(descriptor), instance, guid)?;
        self.checked(IconRef::Cached(cached)).map(Some)
    }

    fn checked(&self, icon: IconRef) -> Result<IconRef, IconError> {
        self.loader.load(&icon)?;
        Ok(icon)
    }

    /// Copy `source` to `<cache>/<instance>/<guid>.ico`.
    fn copy_to_cache(&self, source: &Path, instance: &str, guid: &str) -> Result<PathBuf, IconError> {
        let dir = self.cache_dir.join(cache_file_stem(instance));
        fs::create_dir_all(&dir).map_err(|source| IconError::CacheDir {
            path: dir.clone(),
            source,
        })?;
        let target = dir.join(format!("{}.ico", cache_file_stem(guid)));
        fs::copy(source, &target).map_err(|e| IconError::Copy {
            path: source.to_path_buf(),
            source: e,
        })?;
        log::debug!("Cached icon {} as {}", source.display(), target.display());
        Ok(target)
    }
}

/// True for `{...}`-wrapped GUIDs, the shape of built-in profile ids.
pub fn is_braced_guid(guid: &str) -> bool {
    guid.len() >= 2 && guid.starts_with('{') && guid.ends_with('}')
}

/// Filesystem path an external icon descriptor points at.
pub fn external_source(descriptor: &str) -> PathBuf {
    match descriptor.strip_prefix(FILE_URI_PREFIX) {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(expand_env_vars(descriptor)),
    }
}

/// A single path component safe on every platform.
fn cache_file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        format!("_{stem}")
    } else {
        stem
    }
}

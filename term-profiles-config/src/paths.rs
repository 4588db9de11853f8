//! Package path templates and filesystem checks.
//!
//! Packaged Windows Terminal installs keep their settings under
//! `%LOCALAPPDATA%\Packages\<package>\LocalState` and expose an app execution
//! alias under `%LOCALAPPDATA%\Microsoft\WindowsApps\<package>`.

use std::path::{Path, PathBuf};

/// Executable name inside a package's WindowsApps directory.
pub const TERMINAL_EXECUTABLE: &str = "wt.exe";

/// Default paths derived from a package family name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePaths {
    /// `<LOCALAPPDATA>/Microsoft/WindowsApps/<package>`; its presence means
    /// the package is installed.
    pub install_dir: PathBuf,
    /// `<LOCALAPPDATA>/Packages/<package>/LocalState/settings.json`
    pub settings_file: PathBuf,
    /// `<LOCALAPPDATA>/Microsoft/WindowsApps/<package>/wt.exe`
    pub executable: PathBuf,
}

impl PackagePaths {
    /// Substitute `package` into the path templates rooted at `local_app_data`.
    pub fn derive(local_app_data: &Path, package: &str) -> Self {
        let install_dir = windows_apps_dir(local_app_data).join(package);
        Self {
            settings_file: local_app_data
                .join("Packages")
                .join(package)
                .join("LocalState")
                .join("settings.json"),
            executable: install_dir.join(TERMINAL_EXECUTABLE),
            install_dir,
        }
    }

    /// True if the package's install directory exists.
    pub fn is_installed(&self) -> bool {
        self.install_dir.exists()
    }
}

/// `%LOCALAPPDATA%\Microsoft\WindowsApps`
pub fn windows_apps_dir(local_app_data: &Path) -> PathBuf {
    local_app_data.join("Microsoft").join("WindowsApps")
}

/// The local application data directory (`%LOCALAPPDATA%` on Windows).
pub fn local_app_data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// True if `path` exists or is a link entry, even a dangling one.
///
/// App execution aliases are reparse points that `exists()` cannot always
/// follow, so the link itself is accepted.
pub fn exists_or_is_link(path: &Path) -> bool {
    path.exists() || std::fs::symlink_metadata(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_derive_templates() {
        let root = PathBuf::from("/lad");
        let paths = PackagePaths::derive(&root, "Foo.Package");
        assert_eq!(
            paths.settings_file,
            PathBuf::from("/lad/Packages/Foo.Package/LocalState/settings.json")
        );
        assert_eq!(
            paths.executable,
            PathBuf::from("/lad/Microsoft/WindowsApps/Foo.Package/wt.exe")
        );
        assert_eq!(
            paths.install_dir,
            PathBuf::from("/lad/Microsoft/WindowsApps/Foo.Package")
        );
    }

    #[test]
    fn test_is_installed() {
        let temp = TempDir::new().unwrap();
        let paths = PackagePaths::derive(temp.path(), "Foo.Package");
        assert!(!paths.is_installed());
        std::fs::create_dir_all(&paths.install_dir).unwrap();
        assert!(paths.is_installed());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_counts_as_present() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("wt.exe");
        std::os::unix::fs::symlink(temp.path().join("missing"), &link).unwrap();
        assert!(!link.exists());
        assert!(exists_or_is_link(&link));
        assert!(!exists_or_is_link(&temp.path().join("other")));
    }
}

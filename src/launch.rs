//! Launch modes and process invocations.
//!
//! [`dispatch`] turns an item target and a [`LaunchMode`] into an
//! [`Invocation`]: the executable, its arguments and whether it must run
//! elevated. [`ProcessLauncher`] implementations carry it out.
//!
//! The profile GUID is passed through unchecked; an unknown GUID is the
//! terminal's problem.

use crate::catalog::ItemTarget;
use crate::error::LaunchError;
use crate::registry::InstanceRegistry;
use std::path::{Path, PathBuf};

/// Shell used to wrap elevated launches.
pub const ELEVATION_SHELL: &str = "cmd.exe";

/// How a profile is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LaunchMode {
    /// New window.
    #[default]
    Open,
    /// New tab in the most recently used window.
    OpenNewTab,
    /// New window with administrator privileges.
    Elevate,
}

impl LaunchMode {
    /// All modes, in the order actions are offered.
    pub const ALL: [LaunchMode; 3] = [LaunchMode::Open, LaunchMode::OpenNewTab, LaunchMode::Elevate];

    /// Action identifier registered with the host.
    pub fn action_name(self) -> &'static str {
        match self {
            LaunchMode::Open => "wt.open",
            LaunchMode::OpenNewTab => "wt.open_new_tab",
            LaunchMode::Elevate => "wt.elevate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LaunchMode::Open => "Open",
            LaunchMode::OpenNewTab => "Open new tab",
            LaunchMode::Elevate => "Run as Administrator",
        }
    }

    pub fn short_desc(self) -> &'static str {
        match self {
            LaunchMode::Open => "Open this profile in a new window",
            LaunchMode::OpenNewTab => "Open this profile in a new tab of an existing window",
            LaunchMode::Elevate => "Open this profile in a new window with elevated privileges",
        }
    }

    /// Map a host action back to a mode. No action, or an unknown one, opens
    /// the profile normally.
    pub fn from_action_name(action: Option<&str>) -> Self {
        Self::ALL
            .into_iter()
            .find(|mode| Some(mode.action_name()) == action)
            .unwrap_or_default()
    }
}

/// A process to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Start through the OS "run as administrator" verb.
    pub elevate: bool,
}

impl Invocation {
    /// Invocation of `executable` for `guid` in `mode`.
    pub fn for_profile(executable: &Path, guid: &str, mode: LaunchMode) -> Self {
        let profile_args = ["--profile".to_string(), guid.to_string()];
        match mode {
            LaunchMode::Open => Self {
                program: executable.to_path_buf(),
                args: profile_args.to_vec(),
                elevate: false,
            },
            LaunchMode::OpenNewTab => Self {
                program: executable.to_path_buf(),
                args: ["-w", "0", "new-tab"]
                    .into_iter()
                    .map(String::from)
                    .chain(profile_args)
                    .collect(),
                elevate: false,
            },
            // The terminal cannot elevate itself; `start` from an elevated
            // shell can.
            LaunchMode::Elevate => Self {
                program: PathBuf::from(ELEVATION_SHELL),
                args: ["/c", "start", "", "/b"]
                    .into_iter()
                    .map(String::from)
                    .chain(std::iter::once(executable.to_string_lossy().into_owned()))
                    .chain(profile_args)
                    .collect(),
                elevate: true,
            },
        }
    }
}

/// Decode `target` and build the invocation for `mode`.
///
/// # Errors
///
/// `MalformedTarget` if `target` has no separator, `UnknownInstance` if the
/// instance is not in the registry (for example after a reload removed it).
pub fn dispatch(
    registry: &InstanceRegistry,
    target: &str,
    mode: LaunchMode,
) -> Result<Invocation, LaunchError> {
    let ItemTarget { instance, guid } = ItemTarget::decode(target)
        .ok_or_else(|| LaunchError::MalformedTarget(target.to_string()))?;
    let terminal = registry
        .get(&instance)
        .ok_or(LaunchError::UnknownInstance(instance))?;
    Ok(Invocation::for_profile(terminal.executable_path(), &guid, mode))
}

/// Boundary to the OS process-launch primitives.
pub trait ProcessLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<(), LaunchError>;
}

/// Starts processes with `std::process::Command`, without waiting for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<(), LaunchError> {
        log::info!(
            "Launching {} {:?}{}",
            invocation.program.display(),
            invocation.args,
            if invocation.elevate { " (elevated)" } else { "" }
        );
        let mut command = if invocation.elevate {
            elevated_command(invocation)?
        } else {
            let mut command = std::process::Command::new(&invocation.program);
            command.args(&invocation.args);
            command
        };
        command
            .spawn()
            .map(|_child| ())
            .map_err(|source| LaunchError::Spawn {
                program: invocation.program.clone(),
                source,
            })
    }
}

/// PowerShell's `Start-Process -Verb RunAs` is the scriptable form of the
/// shell "runas" verb.
#[cfg(windows)]
fn elevated_command(invocation: &Invocation) -> Result<std::process::Command, LaunchError> {
    let mut command = std::process::Command::new("powershell.exe");
    command.args(["-NoProfile", "-NonInteractive", "-Command"]);
    command.arg(runas_script(invocation));
    Ok(command)
}

#[cfg(not(windows))]
fn elevated_command(_invocation: &Invocation) -> Result<std::process::Command, LaunchError> {
    Err(LaunchError::ElevationUnsupported)
}

#[cfg_attr(not(windows), allow(dead_code))]
fn runas_script(invocation: &Invocation) -> String {
    let command_line = invocation
        .args
        .iter()
        .map(|arg| quote_windows_arg(arg))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "Start-Process -FilePath {} -ArgumentList {} -Verb RunAs -WindowStyle Hidden",
        quote_powershell(&invocation.program.to_string_lossy()),
        quote_powershell(&command_line)
    )
}

/// Quote one argument for a Windows command line.
///
/// Backslashes are literal unless they precede a quote, so runs before an
/// embedded or the closing quote are doubled.
#[cfg_attr(not(windows), allow(dead_code))]
fn quote_windows_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
        return arg.to_string();
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                quoted.extend(std::iter::repeat_n('\\', backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            c => {
                quoted.extend(std::iter::repeat_n('\\', backslashes));
                quoted.push(c);
                backslashes = 0;
            }
        }
    }
    quoted.extend(std::iter::repeat_n('\\', backslashes * 2));
    quoted.push('"');
    quoted
}

/// Single-quoted PowerShell string literal.
#[cfg_attr(not(windows), allow(dead_code))]
fn quote_powershell(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

//! Command-line host for term-profiles.
//!
//! Lists the catalog, launches items and follows configuration changes.

use crate::icon::{FsIconLoader, IconResolver};
use crate::launch::{LaunchMode, SystemLauncher};
use crate::plugin::TerminalProfiles;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;
use term_profiles_config::watcher::ConfigWatcher;
use term_profiles_config::{InstanceResolver, SkippedInstance, TomlSettings, default_config_path};

/// term-profiles - launch Windows Terminal profiles
#[derive(Parser)]
#[command(name = "term-profiles")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Plugin configuration file (default: <config dir>/term-profiles/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory containing bundled icons
    #[arg(long, global = true, value_name = "DIR")]
    pub resources: Option<PathBuf>,

    /// Cache directory; external profile icons are copied into <DIR>/icons
    /// (default: <cache dir>/term-profiles)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", value_parser = level_arg)]
    pub log_level: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every catalog item
    List,
    /// Launch a catalog item
    Launch {
        /// Item target, `<instance>::<profile guid>`
        target: String,

        /// How to open the profile
        #[arg(long, value_enum, default_value_t = ModeArg::Open)]
        mode: ModeArg,

        /// Print the command instead of running it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the catalog and reprint it whenever the configuration changes
    Watch,
}

fn level_arg(value: &str) -> Result<log::LevelFilter, String> {
    crate::debug::parse_level(value).ok_or_else(|| format!("unknown log level '{value}'"))
}

/// CLI spelling of [`LaunchMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Open,
    NewTab,
    Elevate,
}

impl From<ModeArg> for LaunchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Open => LaunchMode::Open,
            ModeArg::NewTab => LaunchMode::OpenNewTab,
            ModeArg::Elevate => LaunchMode::Elevate,
        }
    }
}

impl Cli {
    fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    fn plugin(&self) -> TerminalProfiles {
        let resources = self
            .resources
            .clone()
            .unwrap_or_else(FsIconLoader::default_resource_dir);
        TerminalProfiles::new(
            InstanceResolver::new(),
            IconResolver::new(FsIconLoader::new(resources), self.icon_cache_dir()),
        )
    }

    fn icon_cache_dir(&self) -> PathBuf {
        let root = self
            .cache_dir
            .clone()
            .unwrap_or_else(IconResolver::default_cache_root);
        IconResolver::icon_cache_dir(&root)
    }
}

fn load_settings(path: &Path) -> Result<TomlSettings> {
    TomlSettings::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

/// Run the parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    if matches!(cli.command, Commands::Watch) {
        ensure_watchable(&config_path)?;
    }
    let mut plugin = cli.plugin();
    let settings = load_settings(&config_path)?;
    report_skipped(&plugin.start(&settings));

    match &cli.command {
        Commands::List => print_catalog(&plugin),
        Commands::Launch {
            target,
            mode,
            dry_run,
        } => {
            let mode = LaunchMode::from(*mode);
            let invocation = plugin
                .invocation(target, Some(mode.action_name()))
                .with_context(|| format!("Cannot launch '{target}'"))?;
            if *dry_run {
                println!(
                    "{}{} {}",
                    if invocation.elevate { "[elevated] " } else { "" },
                    invocation.program.display(),
                    invocation.args.join(" ")
                );
            } else {
                plugin
                    .execute(target, Some(mode.action_name()), &SystemLauncher)
                    .with_context(|| format!("Cannot launch '{target}'"))?;
            }
        }
        Commands::Watch => {
            print_catalog(&plugin);
            watch(&mut plugin, &config_path)?;
        }
    }

    plugin.stop();
    Ok(())
}

/// `watch` follows an existing file; built-in defaults never change.
fn ensure_watchable(config_path: &Path) -> Result<()> {
    if !config_path.is_file() {
        bail!(
            "Nothing to watch: no config file at {} (create it, or pass --config)",
            config_path.display()
        );
    }
    Ok(())
}

fn watch(plugin: &mut TerminalProfiles, config_path: &Path) -> Result<()> {
    let watcher = ConfigWatcher::new(config_path, 200)?;
    loop {
        let Some(event) = watcher.recv_timeout(Duration::from_secs(1)) else {
            continue;
        };
        match load_settings(&event.path) {
            Ok(settings) => {
                report_skipped(&plugin.reload(&settings));
                print_catalog(plugin);
            }
            // Keep the previous instance set until the file parses again.
            Err(e) => log::warn!("{e:#}"),
        }
    }
}

fn report_skipped(skipped: &[SkippedInstance]) {
    for skip in skipped {
        if skip.error.level() <= log::Level::Warn {
            eprintln!("term-profiles: warning: {}", skip.error);
        }
    }
}

fn print_catalog(plugin: &TerminalProfiles) {
    let catalog = plugin.catalog();
    for item in &catalog.items {
        let icon = item
            .icon
            .as_ref()
            .or(catalog.default_icon.as_ref())
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        println!("{}\t{}\t{}", item.label, item.target, icon);
    }
}

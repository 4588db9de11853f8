//! Config file watcher for automatic reload.
//!
//! Watches the plugin config file for changes and emits reload events. Uses
//! debouncing to avoid multiple reloads during rapid saves from editors.

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, PollWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::{Duration, Instant};

/// Event indicating the config file has changed and needs reloading.
#[derive(Debug, Clone)]
pub struct ConfigReloadEvent {
    /// Path to the config file that changed.
    pub path: PathBuf,
}

/// Watches the config file for changes and sends reload events.
pub struct ConfigWatcher {
    /// Kept alive to keep watching.
    _watcher: Box<dyn Watcher + Send>,
    event_receiver: Receiver<ConfigReloadEvent>,
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher").finish_non_exhaustive()
    }
}

/// Shared handler state for both watcher backends.
#[derive(Clone)]
struct HandlerState {
    filename: OsString,
    canonical_path: PathBuf,
    debounce_delay: Duration,
    tx: Sender<ConfigReloadEvent>,
    last_event_time: Arc<Mutex<Option<Instant>>>,
}

impl HandlerState {
    fn into_handler(self) -> impl Fn(notify::Result<Event>) + Send + 'static {
        move |result: notify::Result<Event>| {
            let Ok(event) = result else {
                return;
            };
            // Create covers editors that save by rename.
            if !matches!(
                event.kind,
                notify::EventKind::Modify(_) | notify::EventKind::Create(_)
            ) {
                return;
            }
            if !event
                .paths
                .iter()
                .any(|p| p.file_name().is_some_and(|f| f == self.filename))
            {
                return;
            }

            let now = Instant::now();
            {
                let mut last = self.last_event_time.lock();
                if let Some(last_time) = *last
                    && now.duration_since(last_time) < self.debounce_delay
                {
                    log::trace!("Debouncing config reload event");
                    return;
                }
                *last = Some(now);
            }

            log::info!("Config file changed: {}", self.canonical_path.display());
            if let Err(e) = self.tx.send(ConfigReloadEvent {
                path: self.canonical_path.clone(),
            }) {
                log::error!("Failed to send config reload event: {}", e);
            }
        }
    }
}

impl ConfigWatcher {
    /// Create a new config watcher.
    ///
    /// Uses the platform's native watcher when available and falls back to a
    /// `PollWatcher` checking every 500 ms.
    ///
    /// # Errors
    /// Returns an error if the config file doesn't exist or watching fails on both
    /// backends.
    pub fn new(config_path: &Path, debounce_delay_ms: u64) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        let canonical = config_path
            .canonicalize()
            .unwrap_or_else(|_| config_path.to_path_buf());
        let filename = canonical
            .file_name()
            .context("Config path has no filename")?
            .to_os_string();
        let parent_dir = canonical
            .parent()
            .context("Config path has no parent directory")?
            .to_path_buf();

        let (tx, rx) = channel::<ConfigReloadEvent>();
        let state = HandlerState {
            filename,
            canonical_path: canonical.clone(),
            debounce_delay: Duration::from_millis(debounce_delay_ms),
            tx,
            last_event_time: Arc::new(Mutex::new(None)),
        };

        let mut watcher = Self::create_watcher(state)?;
        watcher
            .watch(&parent_dir, RecursiveMode::NonRecursive)
            .with_context(|| {
                format!("Failed to watch config directory: {}", parent_dir.display())
            })?;

        log::info!("Config hot reload: watching {}", canonical.display());

        Ok(Self {
            _watcher: watcher,
            event_receiver: rx,
        })
    }

    fn create_watcher(state: HandlerState) -> Result<Box<dyn Watcher + Send>> {
        match notify::recommended_watcher(state.clone().into_handler()) {
            Ok(w) => {
                log::debug!("Config watcher: using native (RecommendedWatcher) backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!(
                    "Config watcher: native backend unavailable ({}); falling back to PollWatcher",
                    e
                );
                let poll_watcher = PollWatcher::new(
                    state.into_handler(),
                    NotifyConfig::default().with_poll_interval(Duration::from_millis(500)),
                )
                .context("Failed to create fallback PollWatcher")?;
                Ok(Box::new(poll_watcher))
            }
        }
    }

    /// Next pending reload event, without blocking.
    pub fn try_recv(&self) -> Option<ConfigReloadEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Wait up to `timeout` for the next reload event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ConfigReloadEvent> {
        self.event_receiver.recv_timeout(timeout).ok()
    }
}

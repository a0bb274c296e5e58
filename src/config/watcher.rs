//! Configuration file watcher for hot reload.
//!
//! Editors often emit several events per save; a reload is only forwarded
//! when the validated config differs from the last one sent.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;

/// Watches one configuration file and publishes validated updates.
pub struct ConfigWatcher {
    path: PathBuf,
    current: AppConfig,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, seeded with the config already in use.
    ///
    /// Returns the watcher and the receiving end of the update channel.
    pub fn new(path: &Path, current: AppConfig) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                current,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// Updates stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let ConfigWatcher {
            path,
            mut current,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_relevant(&event, &path) => {
                    if let Some(config) = reload(&path, &current) {
                        current = config.clone();
                        let _ = update_tx.send(config);
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %watched.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn is_relevant(event: &Event, path: &Path) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && (event.paths.is_empty() || event.paths.iter().any(|p| p.ends_with(path) || path.ends_with(p)))
}

/// Load the file again; `None` if it is invalid or unchanged.
fn reload(path: &Path, current: &AppConfig) -> Option<AppConfig> {
    match load_config(path) {
        Ok(config) if config == *current => {
            tracing::debug!(path = %path.display(), "Config file touched but unchanged");
            None
        }
        Ok(config) => {
            tracing::info!(path = %path.display(), "Config file changed, reloading");
            Some(config)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
            None
        }
    }
}

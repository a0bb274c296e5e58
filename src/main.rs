//! real-ip: resolve the real client IP of newline-delimited JSON events.
//!
//! # Architecture Overview
//!
//! ```text
//!   stdin (JSON lines)
//!        │
//!        ▼
//!   ┌──────────┐    ┌───────────────┐    ┌──────────────────────┐
//!   │ pipeline │───▶│ RealIpFilter  │───▶│ Evaluator            │
//!   │ stream   │    │ fields + tags │    │ peer gate + scan     │
//!   └────┬─────┘    └───────────────┘    │ TrustedNetworks      │
//!        │                               └──────────────────────┘
//!        ▼
//!   stdout (JSON lines)            config watcher ──▶ FilterHandle swap
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::mpsc;

use real_ip::config::watcher::ConfigWatcher;
use real_ip::config::{load_config, AppConfig};
use real_ip::lifecycle::shutdown::Shutdown;
use real_ip::lifecycle::{signals, startup};
use real_ip::observability::logging;
use real_ip::pipeline::{self, FilterHandle};

#[derive(Parser, Clone)]
#[command(name = "real-ip")]
#[command(about = "Resolve the real client IP of JSON events behind trusted proxies", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the filter when the configuration file changes
    #[arg(short, long)]
    watch: bool,

    /// Field holding the peer address (overrides the config)
    #[arg(long)]
    peer_field: Option<String>,

    /// Field holding the forwarded-for chain (overrides the config)
    #[arg(long)]
    xff_field: Option<String>,

    /// Trusted network, repeatable (appended to the config)
    #[arg(long = "trusted")]
    trusted: Vec<String>,

    /// Treat the forwarded-for field as one comma-delimited string
    #[arg(long)]
    xff_is_string: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(field) = &self.peer_field {
            config.filter.remote_address_field = field.clone();
        }
        if let Some(field) = &self.xff_field {
            config.filter.x_forwarded_for_field = field.clone();
        }
        if self.xff_is_string {
            config.filter.x_forwarded_for_is_string = true;
        }
        config.filter.trusted_networks.extend(self.trusted.iter().cloned());
        if self.watch {
            config.pipeline.watch_config = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let file_config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    let mut config = file_config.clone();
    args.apply(&mut config);

    logging::init_logging(&config.observability)?;
    tracing::info!("real-ip v{} starting", env!("CARGO_PKG_VERSION"));

    let filter = startup::start(&config)?;
    let handle = FilterHandle::new(filter);

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_handler(shutdown.clone());

    let (update_tx, config_updates) = mpsc::unbounded_channel();

    // The watcher handle must outlive the pipeline; dropping it stops updates
    let _watcher = match (&args.config, config.pipeline.watch_config) {
        (Some(path), true) => {
            let (watcher, mut file_updates) = ConfigWatcher::new(path, file_config);
            let overrides = args.clone();
            tokio::spawn(async move {
                while let Some(mut update) = file_updates.recv().await {
                    overrides.apply(&mut update);
                    if update_tx.send(update).is_err() {
                        break;
                    }
                }
            });
            Some(watcher.run()?)
        }
        (None, true) => {
            tracing::warn!("--watch ignored: no configuration file given");
            None
        }
        _ => None,
    };

    let stats = pipeline::run(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &handle,
        config_updates,
        shutdown.subscribe(),
    )
    .await?;

    tracing::info!(
        processed = stats.processed,
        reloads = stats.reloads,
        signalled = shutdown.is_triggered(),
        "Shutdown complete"
    );
    Ok(())
}

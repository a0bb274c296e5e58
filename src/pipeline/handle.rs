//! Swappable filter snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::ConfigError;
use crate::config::schema::RealIpConfig;
use crate::filter::RealIpFilter;
use crate::observability::metrics;

/// Shared handle to the active filter.
///
/// Readers take a snapshot with `load`; reloads replace the whole filter
/// atomically, so the trusted set itself is never mutated.
#[derive(Debug)]
pub struct FilterHandle {
    current: ArcSwap<RealIpFilter>,
}

impl FilterHandle {
    pub fn new(filter: RealIpFilter) -> Self {
        Self {
            current: ArcSwap::from_pointee(filter),
        }
    }

    /// The filter in effect right now.
    pub fn load(&self) -> Arc<RealIpFilter> {
        self.current.load_full()
    }

    /// Build a filter from `config` and make it current.
    ///
    /// On error the previous filter stays in place.
    pub fn reload(&self, config: &RealIpConfig) -> Result<(), ConfigError> {
        match RealIpFilter::from_config(config) {
            Ok(filter) => {
                let networks = filter.trusted_networks().len();
                self.current.store(Arc::new(filter));
                metrics::record_config_reload(true);
                metrics::record_trusted_networks(networks);
                tracing::info!(trusted_networks = networks, "Real IP filter reloaded");
                Ok(())
            }
            Err(e) => {
                metrics::record_config_reload(false);
                tracing::error!(error = %e, "Rejected filter reload, keeping current filter");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(networks: &[&str]) -> RealIpConfig {
        RealIpConfig {
            remote_address_field: "remote_addr".into(),
            x_forwarded_for_field: "xff".into(),
            trusted_networks: networks.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let handle = FilterHandle::new(RealIpFilter::from_config(&config(&["10.0.0.0/8"])).unwrap());
        let before = handle.load();

        handle.reload(&config(&["10.0.0.0/8", "fd00::/8"])).unwrap();
        assert_eq!(before.trusted_networks().len(), 1);
        assert_eq!(handle.load().trusted_networks().len(), 2);
    }

    #[test]
    fn test_failed_reload_keeps_previous() {
        let handle = FilterHandle::new(RealIpFilter::from_config(&config(&["10.0.0.0/8"])).unwrap());
        assert!(handle.reload(&config(&["broken"])).is_err());
        assert_eq!(handle.load().trusted_networks().to_string(), "10.0.0.0/8");
    }
}

//! Provider registry module.
//!
//! Holds the configured adapters and decides which one serves a request:
//! - Probe-first selection with linear failover
//! - Manual rotation of the preferred adapter
//! - Concurrent status probes for diagnostics

mod provider_registry;

pub use provider_registry::ProviderRegistry;

//! # Default values
//!
//! Values used for every configuration param missing from the configuration file.

/// Trait defining all the configuration params that have a suitable default value.
pub trait Defaults {
    /// Default log level: `info`
    fn log_level(&self) -> log::LevelFilter {
        log::LevelFilter::Info
    }

    /// Wallet commands are exposed by default
    fn exposure_wallet(&self) -> bool {
        true
    }

    /// Websocket-only commands are not exposed by default
    fn exposure_websocket(&self) -> bool {
        false
    }

    /// Notifications are not exposed by default
    fn exposure_notifications(&self) -> bool {
        false
    }
}

/// Defaults for a wallet server reached over plain HTTP.
pub struct Standard;

impl Defaults for Standard {}

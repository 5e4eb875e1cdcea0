//! # Config
//!
//! This module contains the `Config` struct, which holds all the configuration params of
//! jsoncmd. The `Config` struct in this module is __total__: every field has a value. The
//! [partial](partial::Config) one is what loaders return, with `None` for every param missing
//! from the source.
//!
//! Use `Config::from_partial` to merge a partial config on top of the [defaults](crate::defaults):
//!
//! ```
//! use jsoncmd_config::config::{Config, partial};
//!
//! let config = Config::from_partial(&partial::Config::default());
//! assert_eq!(config, Config::default());
//! ```

use jsoncmd_schema::{FlagFilter, UsageFlag};

use crate::defaults::{Defaults, Standard};

pub mod partial;

/// The total configuration object.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Logging configuration
    pub log: Log,
    /// Which command classes the served API exposes
    pub exposure: Exposure,
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Log {
    /// Level for the jsoncmd crates
    pub level: log::LevelFilter,
}

/// Command classes exposed by the server this configuration describes.
#[derive(Clone, Debug, PartialEq)]
pub struct Exposure {
    /// Expose commands that need a wallet
    pub wallet: bool,
    /// Expose commands that are only usable over websockets
    pub websocket: bool,
    /// Expose server-to-client notifications
    pub notifications: bool,
}

impl Config {
    pub fn from_partial(config: &partial::Config) -> Self {
        let defaults: &dyn Defaults = &Standard;

        Config {
            log: Log::from_partial(&config.log, defaults),
            exposure: Exposure::from_partial(&config.exposure, defaults),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_partial(&partial::Config::default())
    }
}

impl Log {
    pub fn from_partial(config: &partial::Log, defaults: &dyn Defaults) -> Self {
        Log {
            level: config
                .level
                .to_owned()
                .unwrap_or_else(|| defaults.log_level()),
        }
    }
}

impl Exposure {
    pub fn from_partial(config: &partial::Exposure, defaults: &dyn Defaults) -> Self {
        Exposure {
            wallet: config
                .wallet
                .to_owned()
                .unwrap_or_else(|| defaults.exposure_wallet()),
            websocket: config
                .websocket
                .to_owned()
                .unwrap_or_else(|| defaults.exposure_websocket()),
            notifications: config
                .notifications
                .to_owned()
                .unwrap_or_else(|| defaults.exposure_notifications()),
        }
    }

    /// Filter selecting the registered commands this configuration exposes.
    pub fn flag_filter(&self) -> FlagFilter {
        let mut filter = FlagFilter::all();
        if !self.wallet {
            filter = filter.without(UsageFlag::WalletOnly);
        }
        if !self.websocket {
            filter = filter.without(UsageFlag::WebsocketOnly);
        }
        if !self.notifications {
            filter = filter.without(UsageFlag::Notification);
        }

        filter
    }
}

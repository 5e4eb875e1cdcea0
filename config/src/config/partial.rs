//! # Partial Config
//!
//! Loaders produce this __partial__ configuration: every param missing from the source is `None`.
//! `Config::from_partial` fills the gaps with the [defaults](crate::defaults).

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// The partial configuration object.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub log: Log,

    /// Which command classes the served API exposes
    #[serde(default)]
    pub exposure: Exposure,
}

/// Logging partial configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Log {
    /// Level for the jsoncmd crates, e.g. `"debug"`
    #[serde(default, deserialize_with = "as_log_filter")]
    pub level: Option<log::LevelFilter>,
}

/// Exposure partial configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Exposure {
    pub wallet: Option<bool>,
    pub websocket: Option<bool>,
    pub notifications: Option<bool>,
}

fn as_log_filter<'de, D>(deserializer: D) -> Result<Option<log::LevelFilter>, D::Error>
where
    D: Deserializer<'de>,
{
    let level = String::deserialize(deserializer)?;

    log::LevelFilter::from_str(&level)
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("unknown log level {:?}", level)))
}

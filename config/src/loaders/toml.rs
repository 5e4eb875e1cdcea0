//! Load the configuration from a file or a `String` written in [Toml format](https://en.wikipedia.org/wiki/TOML)

use std::{fs, io, path::Path};

use thiserror::Error;

use crate::config::partial::Config;

/// Loading the configuration from a file might fail with an `io::Error`, parsing it with a
/// `toml::de::Error`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read configuration file: {0}")]
    IOError(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Just like `std::result::Result` but with the error param fixed to `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Load configuration from a file written in Toml format.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = fs::read_to_string(path)?;

    from_str(&contents)
}

/// Load configuration from a string written in Toml format.
pub fn from_str(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

//! configuration

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

pub mod config;
pub mod defaults;
pub mod dirs;
pub mod loaders {
    //! Configuration loaders. Every loader returns a partial configuration.
    pub mod toml;
}

pub use crate::config::Config;

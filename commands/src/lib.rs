//! Command definitions served through the schema registry.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

use jsoncmd_schema::Registry;

pub mod btcwallet;

/// Build the registry holding every command known to this crate.
pub fn registry() -> Registry {
    let mut builder = Registry::builder();
    btcwallet::register(&mut builder);

    builder.build()
}

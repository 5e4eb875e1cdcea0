//! Schema registry for positional JSON-RPC commands.
//!
//! A command is a plain serde struct implementing [`Command`], which lists its positional
//! parameters in wire order. Registering it under a method name validates the declaration once,
//! up front, and produces a [`CommandShape`]. The frozen [`Registry`] then converts between typed
//! commands and flat JSON argument arrays:
//!
//! ```
//! use jsoncmd_schema::{Command, Field, Registry, UsageFlag};
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize, PartialEq, Serialize)]
//! struct ImportPubKey {
//!     pubkey: String,
//!     rescan: Option<bool>,
//! }
//!
//! impl Command for ImportPubKey {
//!     fn fields() -> Vec<Field> {
//!         vec![
//!             Field::required::<String>("pubkey"),
//!             Field::optional::<bool>("rescan").with_default(true),
//!         ]
//!     }
//! }
//!
//! let mut builder = Registry::builder();
//! builder.must_register::<ImportPubKey>("importpubkey", UsageFlag::WalletOnly);
//! let registry = builder.build();
//!
//! let cmd: ImportPubKey = registry.unmarshal_as(&[json!("031234")]).unwrap();
//! assert_eq!(cmd.rescan, Some(true));
//! assert_eq!(
//!     registry.marshal(&cmd).unwrap(),
//!     ("importpubkey", vec![json!("031234")])
//! );
//! ```

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

pub mod cli_args;
pub mod command;
pub mod error;
pub mod field;
pub mod flags;
pub mod marshal;
pub mod registry;
pub mod shape;
pub mod types;
pub mod unmarshal;
mod usage;

pub use cli_args::parse_cli_args;
pub use command::{AnyCommand, BoxedCommand, Command};
pub use error::{DecodeError, Error, MarshalError, NotFound, SchemaError};
pub use field::{Field, ParameterDescriptor, Requirement};
pub use flags::{FlagFilter, UsageFlag, UsageFlags};
pub use registry::{Commands, Registry, RegistryBuilder};
pub use shape::CommandShape;
pub use types::{NumericString, ParamKind, ParamType};

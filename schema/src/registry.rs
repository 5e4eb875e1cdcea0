//! The command registry.
//!
//! Commands are registered into a `RegistryBuilder` during initialization, then frozen into a
//! `Registry` that only supports lookups and is shared by request handlers.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt, slice,
};

use serde_json::Value;

use crate::{
    command::{AnyCommand, BoxedCommand, Command, Decoder, decode_boxed},
    error::{DecodeError, Error, MarshalError, NotFound, SchemaError},
    flags::{FlagFilter, UsageFlags},
    marshal::{marshal, marshal_value},
    shape::{CommandShape, build},
    unmarshal::{resolve, unmarshal},
};

struct Entry {
    shape: CommandShape,
    decode: Decoder,
}

#[derive(Default)]
struct Table {
    entries: Vec<Entry>,
    by_method: HashMap<String, usize>,
    by_type: HashMap<TypeId, usize>,
}

impl Table {
    fn by_method(&self, method: &str) -> Option<&Entry> {
        self.by_method.get(method).map(|&i| &self.entries[i])
    }

    fn by_type(&self, type_id: TypeId) -> Option<&Entry> {
        self.by_type.get(&type_id).map(|&i| &self.entries[i])
    }
}

/// Collects command registrations. Freeze it with `build` once every command is registered.
#[derive(Default)]
pub struct RegistryBuilder {
    table: Table,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register command `C` under `method`.
    ///
    /// Fails if the method name or the command type is already registered, or if the command
    /// definition is malformed.
    pub fn register<C: Command>(
        &mut self,
        method: &str,
        flags: impl Into<UsageFlags>,
    ) -> Result<&CommandShape, SchemaError> {
        let type_id = TypeId::of::<C>();
        if self.table.by_method.contains_key(method) {
            return Err(SchemaError::DuplicateMethod(method.to_string()));
        }
        if let Some(existing) = self.table.by_type(type_id) {
            return Err(SchemaError::DuplicateType {
                type_name: existing.shape.type_name(),
                method: existing.shape.method().to_string(),
            });
        }

        let shape = build::<C>(method, flags.into())?;
        log::debug!(
            "Registered {} ({} params, flags: {})",
            shape.method(),
            shape.max_args(),
            shape.flags()
        );

        let index = self.table.entries.len();
        self.table.by_method.insert(method.to_string(), index);
        self.table.by_type.insert(type_id, index);
        self.table.entries.push(Entry {
            shape,
            decode: decode_boxed::<C>,
        });

        Ok(&self.table.entries[index].shape)
    }

    /// Register command `C` under `method`, panicking if the registration fails.
    ///
    /// A failure here is a bug in the command definition, so it aborts initialization.
    pub fn must_register<C: Command>(
        &mut self,
        method: &str,
        flags: impl Into<UsageFlags>,
    ) -> &mut Self {
        if let Err(e) = self.register::<C>(method, flags) {
            panic!("Failed to register method {:?}: {}", method, e);
        }

        self
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// Freeze the registry.
    pub fn build(self) -> Registry {
        log::info!("Command registry ready with {} commands", self.len());

        Registry { table: self.table }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("commands", &self.table.entries.len())
            .finish()
    }
}

/// Read-only table from method name to command shape.
pub struct Registry {
    table: Table,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Shape registered under `method`.
    pub fn lookup(&self, method: &str) -> Result<&CommandShape, NotFound> {
        self.entry(method).map(|entry| &entry.shape)
    }

    /// Method under which command `C` is registered.
    pub fn method_of<C: Command>(&self) -> Result<&str, NotFound> {
        self.entry_of(TypeId::of::<C>(), std::any::type_name::<C>())
            .map(|entry| entry.shape.method())
    }

    /// Registered commands whose flags pass `filter`, in registration order.
    pub fn enumerate(&self, filter: FlagFilter) -> Commands<'_> {
        Commands {
            entries: self.table.entries.iter(),
            filter,
        }
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// One-line usage text of `method`.
    pub fn usage(&self, method: &str) -> Result<String, NotFound> {
        self.lookup(method).map(CommandShape::usage)
    }

    /// Decode the positional `params` of `method` into whatever command type it is registered
    /// with.
    pub fn unmarshal(&self, method: &str, params: &[Value]) -> Result<BoxedCommand, Error> {
        let entry = self.entry(method)?;
        let decode_error = |source| Error::Decode {
            method: method.to_string(),
            source,
        };

        let object = resolve(params, &entry.shape).map_err(decode_error)?;
        let command = (entry.decode)(object)
            .map_err(|e| decode_error(DecodeError::Rejected(e.to_string())))?;
        log::trace!("Decoded {}: {:?}", method, command);

        Ok(command)
    }

    /// Decode the positional `params` of the method `C` is registered under.
    pub fn unmarshal_as<C: Command>(&self, params: &[Value]) -> Result<C, Error> {
        let method = self.method_of::<C>()?;
        let shape = &self.entry(method)?.shape;

        unmarshal(params, shape).map_err(|source| Error::Decode {
            method: method.to_string(),
            source,
        })
    }

    /// Encode `command` as its method name and positional params.
    pub fn marshal<C: Command>(&self, command: &C) -> Result<(&str, Vec<Value>), Error> {
        let method = self.method_of::<C>()?;
        let shape = &self.entry(method)?.shape;

        marshal(command, shape)
            .map(|params| (method, params))
            .map_err(|source| Error::Marshal {
                method: method.to_string(),
                source,
            })
    }

    /// Same as `marshal`, for a command of unknown type.
    pub fn marshal_any(&self, command: &dyn AnyCommand) -> Result<(&str, Vec<Value>), Error> {
        let entry = self.entry_of(Any::type_id(command.as_any()), command.type_name())?;
        let method = entry.shape.method();
        let marshal_error = |source| Error::Marshal {
            method: method.to_string(),
            source,
        };

        let value = command
            .to_json()
            .map_err(|e| marshal_error(MarshalError::Serialize(e.to_string())))?;
        let params = marshal_value(value, &entry.shape).map_err(marshal_error)?;

        Ok((method, params))
    }

    fn entry(&self, method: &str) -> Result<&Entry, NotFound> {
        self.table.by_method(method).ok_or_else(|| {
            log::debug!("Unknown method {:?}", method);
            NotFound::Method(method.to_string())
        })
    }

    fn entry_of(&self, type_id: TypeId, type_name: &'static str) -> Result<&Entry, NotFound> {
        self.table
            .by_type(type_id)
            .ok_or(NotFound::Type(type_name))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.table.entries.iter().map(|entry| entry.shape.method()))
            .finish()
    }
}

/// Iterator over registered commands, see `Registry::enumerate`.
#[derive(Clone)]
pub struct Commands<'a> {
    entries: slice::Iter<'a, Entry>,
    filter: FlagFilter,
}

impl<'a> Iterator for Commands<'a> {
    type Item = (&'a str, &'a CommandShape);

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.entries
            .by_ref()
            .map(|entry| &entry.shape)
            .find(|shape| filter.matches(shape.flags()))
            .map(|shape| (shape.method(), shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::Field, flags::UsageFlag};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq, Serialize)]
    struct DumpWallet {
        filename: String,
    }

    impl Command for DumpWallet {
        fn fields() -> Vec<Field> {
            vec![Field::required::<String>("filename")]
        }
    }

    #[derive(Debug, Deserialize, PartialEq, Serialize)]
    struct GetBlockCount {}

    impl Command for GetBlockCount {
        fn fields() -> Vec<Field> {
            vec![]
        }
    }

    fn registry() -> Registry {
        let mut builder = Registry::builder();
        builder
            .must_register::<DumpWallet>("dumpwallet", UsageFlag::WalletOnly)
            .must_register::<GetBlockCount>("getblockcount", UsageFlag::ChainOnly);

        builder.build()
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
        assert_send_sync::<BoxedCommand>();
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let mut builder = RegistryBuilder::new();
        builder.must_register::<DumpWallet>("dumpwallet", UsageFlag::WalletOnly);

        let err = builder
            .register::<DumpWallet>("backupwallet", UsageFlag::WalletOnly)
            .unwrap_err();

        assert_eq!(
            err,
            SchemaError::DuplicateType {
                type_name: std::any::type_name::<DumpWallet>(),
                method: "dumpwallet".to_string()
            }
        );
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn failed_registration_leaves_no_trace() {
        let mut builder = RegistryBuilder::new();
        assert!(
            builder
                .register::<DumpWallet>("dump wallet", UsageFlag::WalletOnly)
                .is_err()
        );
        assert!(builder.is_empty());
        assert!(
            builder
                .register::<DumpWallet>("dumpwallet", UsageFlag::WalletOnly)
                .is_ok()
        );
    }

    #[test]
    fn reverse_lookup() {
        let registry = registry();

        assert_eq!(registry.method_of::<DumpWallet>(), Ok("dumpwallet"));
        assert_eq!(registry.method_of::<GetBlockCount>(), Ok("getblockcount"));
    }

    #[test]
    fn boxed_command_downcasts() {
        let registry = registry();
        let command = registry
            .unmarshal("dumpwallet", &[json!("/tmp/dump.txt")])
            .unwrap();

        assert!(command.is::<DumpWallet>());
        assert!(command.downcast_ref::<GetBlockCount>().is_none());
        assert_eq!(
            registry.marshal_any(&*command),
            Ok(("dumpwallet", vec![json!("/tmp/dump.txt")]))
        );
        assert_eq!(
            command.downcast::<DumpWallet>(),
            Some(DumpWallet {
                filename: "/tmp/dump.txt".to_string()
            })
        );
    }

    #[test]
    fn errors_map_to_rpc_codes() {
        let registry = registry();

        let err = registry.unmarshal("getbalance", &[]).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.into_parts().0, -32601);

        let err = registry.unmarshal("dumpwallet", &[]).unwrap_err();
        assert!(!err.is_not_found());
        let (code, message, _) = err.into_parts();
        assert_eq!((code, message), (-32602, "Invalid params"));
    }
}

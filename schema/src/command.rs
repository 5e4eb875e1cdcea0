//! The `Command` trait and its type-erased form.

use std::{any::Any, fmt};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::field::Field;

/// A typed RPC command: the struct holding the parameters of one method.
///
/// Fields are serialized by name; `fields()` lists them in wire (positional) order. Optional
/// parameters are usually `Option<T>` so that "not set" and "set to the zero value" stay distinct.
pub trait Command: Serialize + DeserializeOwned + fmt::Debug + Send + Sync + 'static {
    /// Positional parameters, in wire order.
    fn fields() -> Vec<Field>;
}

/// Object-safe view of any `Command`, as returned when decoding by method name.
pub trait AnyCommand: fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    /// Rust type name of the concrete command.
    fn type_name(&self) -> &'static str;
    /// Serialize the concrete command.
    fn to_json(&self) -> Result<Value, serde_json::Error>;
}

impl<C: Command> AnyCommand for C {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }

    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl dyn AnyCommand {
    /// Whether the concrete command is a `C`.
    pub fn is<C: Command>(&self) -> bool {
        self.as_any().is::<C>()
    }

    pub fn downcast_ref<C: Command>(&self) -> Option<&C> {
        self.as_any().downcast_ref()
    }

    /// Take the concrete command out of the box. Returns `None`, dropping the command, if it is
    /// not a `C`.
    pub fn downcast<C: Command>(self: Box<Self>) -> Option<C> {
        self.into_any().downcast::<C>().ok().map(|command| *command)
    }
}

/// A decoded command of unknown type.
pub type BoxedCommand = Box<dyn AnyCommand>;

/// Builds a boxed command out of the by-name object produced by positional decoding.
pub(crate) type Decoder = fn(Map<String, Value>) -> Result<BoxedCommand, serde_json::Error>;

pub(crate) fn decode_boxed<C: Command>(
    object: Map<String, Value>,
) -> Result<BoxedCommand, serde_json::Error> {
    let command: C = serde_json::from_value(Value::Object(object))?;

    Ok(Box::new(command))
}

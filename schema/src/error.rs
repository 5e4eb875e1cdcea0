//! Error types.
//!
//! `SchemaError` is raised while registering commands and means the command definition itself is
//! broken. `DecodeError`, `NotFound` and `MarshalError` are raised while serving and are meant to
//! be reported back to the caller.

use serde_json::{Value, json};
use thiserror::Error;

use crate::{flags::UsageFlags, types::ParamType};

/// A malformed command definition, detected at registration time.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("method name must not be empty")]
    EmptyMethod,
    #[error("method name {0:?} must not contain whitespace")]
    InvalidMethod(String),
    #[error("method {0:?} is already registered")]
    DuplicateMethod(String),
    #[error("command type {type_name} is already registered as method {method:?}")]
    DuplicateType {
        type_name: &'static str,
        method: String,
    },
    #[error("usage flags {flags} are contradictory: {reason}")]
    ContradictoryFlags {
        flags: UsageFlags,
        reason: &'static str,
    },
    #[error("parameter #{} has an empty name", .index + 1)]
    EmptyFieldName { index: usize },
    #[error("field {0:?} is declared more than once")]
    DuplicateField(&'static str),
    #[error(
        "all fields after the first optional field must also be optional (field {field:?}, index {index}, after optional field {after:?})"
    )]
    RequiredAfterOptional {
        field: &'static str,
        index: usize,
        after: &'static str,
    },
    #[error("required field {0:?} cannot have a default value")]
    DefaultOnRequired(&'static str),
    #[error("default value {default} of field {field:?} does not match type {expected}")]
    MismatchedDefault {
        field: &'static str,
        expected: ParamType,
        default: Value,
    },
    #[error("default value of field {field:?} failed to serialize: {reason}")]
    UnserializableDefault { field: &'static str, reason: String },
    #[error("declared fields do not match command type {type_name}: {reason}")]
    FieldsMismatch {
        type_name: &'static str,
        reason: String,
    },
}

/// Positional arguments that do not fit a command shape.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("too many arguments (expected at most {max}, received {received})")]
    TooManyArguments { max: usize, received: usize },
    #[error("missing required argument #{} '{field}'", .position + 1)]
    MissingArgument {
        position: usize,
        field: &'static str,
    },
    #[error("parameter #{} '{field}' must be type {expected} (got {received})", .position + 1)]
    TypeMismatch {
        position: usize,
        field: &'static str,
        expected: ParamType,
        received: String,
    },
    #[error("argument #{} '{field}' is not a valid {expected}: {value:?}", .position + 1)]
    InvalidArgument {
        position: usize,
        field: &'static str,
        expected: ParamType,
        value: String,
    },
    #[error("arguments do not form a valid command: {0}")]
    Rejected(String),
}

/// A command value that cannot be turned into positional arguments.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MarshalError {
    #[error("command failed to serialize: {0}")]
    Serialize(String),
    #[error("command serialized to {0} instead of an object")]
    NotAnObject(&'static str),
    #[error("command value has no field {0:?}")]
    MissingField(&'static str),
}

/// No schema exists for the requested method or command type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NotFound {
    #[error("method {0:?} is not registered")]
    Method(String),
    #[error("command type {0} is not registered")]
    Type(&'static str),
}

/// Errors returned by the registry while serving requests.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error("invalid parameters for method {method:?}: {source}")]
    Decode {
        method: String,
        #[source]
        source: DecodeError,
    },
    #[error("cannot marshal method {method:?}: {source}")]
    Marshal {
        method: String,
        #[source]
        source: MarshalError,
    },
}

impl Error {
    /// Whether no schema was found, as opposed to the arguments being wrong.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// JSON-RPC error code, message and data for this error.
    pub fn into_parts(self) -> (i64, &'static str, Option<Value>) {
        match self {
            Error::NotFound(e) => (
                -32601,
                "Method not found",
                Some(json!({ "cause": e.to_string() })),
            ),
            Error::Decode { method, source } => (
                -32602,
                "Invalid params",
                Some(json!({ "method": method, "cause": source.to_string() })),
            ),
            Error::Marshal { method, source } => {
                log::error!("Failed to marshal {}: {}", method, source);
                (
                    -32603,
                    "Internal error",
                    Some(json!({ "method": method, "cause": source.to_string() })),
                )
            }
        }
    }
}

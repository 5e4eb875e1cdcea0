//! Conversion of command-line strings into JSON arguments.
//!
//! This is the only place where text is turned into numbers or booleans. The result still goes
//! through the strict unmarshaler.

use serde_json::{Number, Value};

use crate::{
    error::DecodeError,
    field::ParameterDescriptor,
    shape::CommandShape,
    types::{ParamType, is_numeric},
};

/// Convert command-line strings into positional JSON arguments for `shape`.
pub fn parse_cli_args<S: AsRef<str>>(
    args: &[S],
    shape: &CommandShape,
) -> Result<Vec<Value>, DecodeError> {
    if args.len() > shape.max_args() {
        return Err(DecodeError::TooManyArguments {
            max: shape.max_args(),
            received: args.len(),
        });
    }

    args.iter()
        .zip(shape.params())
        .enumerate()
        .map(|(position, (arg, param))| convert(position, arg.as_ref(), param))
        .collect()
}

fn convert(position: usize, arg: &str, param: &ParameterDescriptor) -> Result<Value, DecodeError> {
    let ty = param.param_type();
    let value = match ty {
        ParamType::String => Some(Value::String(arg.to_string())),
        ParamType::NumericString => is_numeric(arg).then(|| Value::String(arg.to_string())),
        ParamType::Bool => parse_bool(arg).map(Value::Bool),
        ParamType::Int => parse_int(arg),
        ParamType::Float => arg
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        ParamType::Array(_) | ParamType::Map(_) | ParamType::Object => {
            serde_json::from_str(arg).ok()
        }
    };

    value.ok_or_else(|| DecodeError::InvalidArgument {
        position,
        field: param.name(),
        expected: ty.clone(),
        value: arg.to_string(),
    })
}

fn parse_bool(arg: &str) -> Option<bool> {
    match arg {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn parse_int(arg: &str) -> Option<Value> {
    arg.parse::<i64>()
        .map(Value::from)
        .or_else(|_| arg.parse::<u64>().map(Value::from))
        .ok()
}

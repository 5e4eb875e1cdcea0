//! Positional unmarshaling: JSON argument array to typed command.

use serde_json::{Map, Value};

use crate::{command::Command, error::DecodeError, shape::CommandShape};

/// Decode positional arguments into a `C`.
///
/// Omitted trailing optional arguments, and optional arguments given as `null`, take their
/// default. Every present argument must strictly match its declared type.
pub fn unmarshal<C: Command>(args: &[Value], shape: &CommandShape) -> Result<C, DecodeError> {
    let object = resolve(args, shape)?;

    serde_json::from_value(Value::Object(object)).map_err(|e| DecodeError::Rejected(e.to_string()))
}

/// Check positional arguments against `shape` and key them by parameter name, defaults filled in.
pub(crate) fn resolve(
    args: &[Value],
    shape: &CommandShape,
) -> Result<Map<String, Value>, DecodeError> {
    if args.len() > shape.max_args() {
        return Err(DecodeError::TooManyArguments {
            max: shape.max_args(),
            received: args.len(),
        });
    }

    let mut object = Map::new();
    for (position, param) in shape.params().iter().enumerate() {
        let value = match (args.get(position), param.default()) {
            (Some(Value::Null), Some(default)) | (None, Some(default)) => default.clone(),
            (Some(value), _) => {
                param.check(position, value)?;
                value.clone()
            }
            (None, None) => {
                return Err(DecodeError::MissingArgument {
                    position,
                    field: param.name(),
                });
            }
        };
        object.insert(param.name().to_string(), value);
    }

    Ok(object)
}

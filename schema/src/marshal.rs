//! Positional marshaling: typed command to JSON argument array.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::MarshalError,
    shape::CommandShape,
    types::{json_kind, values_equal},
};

/// Encode `command` as positional arguments.
///
/// Required parameters are always emitted. Trailing optional parameters equal to their default
/// are left out; an optional parameter followed by a non-default one is emitted with its default.
/// An optional parameter that is unset (`null` or missing) counts as its default.
pub fn marshal<C: Serialize>(
    command: &C,
    shape: &CommandShape,
) -> Result<Vec<Value>, MarshalError> {
    let value = serde_json::to_value(command).map_err(|e| MarshalError::Serialize(e.to_string()))?;

    marshal_value(value, shape)
}

/// Same as `marshal`, for a command already serialized to JSON.
pub fn marshal_value(value: Value, shape: &CommandShape) -> Result<Vec<Value>, MarshalError> {
    match value {
        Value::Object(object) => marshal_object(object, shape),
        other => Err(MarshalError::NotAnObject(json_kind(&other))),
    }
}

/// Same as `marshal`, for a command serialized to a by-name object.
pub fn marshal_object(
    mut object: Map<String, Value>,
    shape: &CommandShape,
) -> Result<Vec<Value>, MarshalError> {
    let mut args = Vec::with_capacity(shape.max_args());
    let mut keep = 0;

    for param in shape.params() {
        let value = object.remove(param.name()).filter(|v| !v.is_null());
        let value = match (value, param.default()) {
            (Some(value), Some(default)) => {
                if !values_equal(&value, default) {
                    keep = args.len() + 1;
                }
                value
            }
            (Some(value), None) => {
                keep = args.len() + 1;
                value
            }
            (None, Some(default)) => default.clone(),
            (None, None) => return Err(MarshalError::MissingField(param.name())),
        };
        args.push(value);
    }
    args.truncate(keep);

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        command::Command,
        field::Field,
        flags::UsageFlags,
        shape::build,
    };
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, Serialize)]
    struct ImportPubKey {
        pubkey: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        rescan: Option<bool>,
    }

    impl Command for ImportPubKey {
        fn fields() -> Vec<Field> {
            vec![
                Field::required::<String>("pubkey"),
                Field::optional::<bool>("rescan").with_default(true),
            ]
        }
    }

    fn shape() -> CommandShape {
        build::<ImportPubKey>("importpubkey", UsageFlags::empty()).unwrap()
    }

    #[test]
    fn skipped_optional_counts_as_default() {
        let cmd = ImportPubKey {
            pubkey: "031234".to_string(),
            rescan: None,
        };

        assert_eq!(marshal(&cmd, &shape()), Ok(vec![json!("031234")]));
    }

    #[test]
    fn non_default_optional_is_emitted() {
        let cmd = ImportPubKey {
            pubkey: "031234".to_string(),
            rescan: Some(false),
        };

        assert_eq!(
            marshal(&cmd, &shape()),
            Ok(vec![json!("031234"), json!(false)])
        );
    }

    #[test]
    fn missing_required_field() {
        assert_eq!(
            marshal_value(json!({ "rescan": false }), &shape()),
            Err(MarshalError::MissingField("pubkey"))
        );
        assert_eq!(
            marshal_value(json!(["031234"]), &shape()),
            Err(MarshalError::NotAnObject("array"))
        );
    }
}

//! Command shapes: the validated argument contract of one RPC method.

use std::collections::BTreeSet;

use itertools::Itertools;
use serde_json::{Map, Value};

use crate::{
    command::Command,
    error::SchemaError,
    field::{ParameterDescriptor, classify},
    flags::UsageFlags,
    types::json_kind,
    usage,
};

/// Method name, ordered parameters and usage flags of a registered command.
#[derive(Clone, Debug)]
pub struct CommandShape {
    method: String,
    type_name: &'static str,
    params: Vec<ParameterDescriptor>,
    flags: UsageFlags,
}

impl CommandShape {
    /// Wire method name.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Rust type name of the command struct.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Positional parameters, in wire order.
    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    pub fn flags(&self) -> UsageFlags {
        self.flags
    }

    /// Number of leading parameters that must always be present.
    pub fn required_count(&self) -> usize {
        self.params.iter().take_while(|p| !p.is_optional()).count()
    }

    /// Maximum number of positional arguments.
    pub fn max_args(&self) -> usize {
        self.params.len()
    }

    /// Parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// One-line usage text, e.g. `importaddress "address" "account" (rescan=true)`.
    pub fn usage(&self) -> String {
        usage::render(self)
    }

    /// The object every parameter's placeholder value decodes from, keyed by name.
    fn placeholder_object(&self) -> Map<String, Value> {
        self.params
            .iter()
            .map(|p| (p.name().to_string(), p.placeholder()))
            .collect()
    }
}

/// Build and validate the shape of command `C` under `method`.
///
/// Besides classifying the declared fields, this checks that they agree with the Rust type: an
/// object holding every parameter's default (or a sample of its type) must decode into `C`, and
/// `C` must serialize back to exactly the declared names, each holding a value of its declared
/// type. Items of arrays and maps of objects are not sampled, so their types go unchecked.
pub fn build<C: Command>(method: &str, flags: UsageFlags) -> Result<CommandShape, SchemaError> {
    if method.is_empty() {
        return Err(SchemaError::EmptyMethod);
    }
    if method.chars().any(char::is_whitespace) {
        return Err(SchemaError::InvalidMethod(method.to_string()));
    }
    flags.validate()?;

    let shape = CommandShape {
        method: method.to_string(),
        type_name: std::any::type_name::<C>(),
        params: classify(C::fields())?,
        flags,
    };
    probe::<C>(&shape)?;

    Ok(shape)
}

fn probe<C: Command>(shape: &CommandShape) -> Result<(), SchemaError> {
    let mismatch = |reason: String| SchemaError::FieldsMismatch {
        type_name: shape.type_name,
        reason,
    };

    let command: C = serde_json::from_value(Value::Object(shape.placeholder_object()))
        .map_err(|e| mismatch(format!("sample values do not decode: {}", e)))?;
    let encoded = serde_json::to_value(&command)
        .map_err(|e| mismatch(format!("command does not serialize: {}", e)))?;
    let object = match encoded {
        Value::Object(object) => object,
        other => {
            return Err(mismatch(format!(
                "command serializes to {} instead of an object",
                json_kind(&other)
            )));
        }
    };

    let declared: BTreeSet<&str> = shape.params.iter().map(|p| p.name()).collect();
    let serialized: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    if declared != serialized {
        let undeclared = serialized.difference(&declared).join(", ");
        let missing = declared.difference(&serialized).join(", ");
        return Err(mismatch(format!(
            "undeclared fields [{}], fields not serialized [{}]",
            undeclared, missing
        )));
    }

    for (position, param) in shape.params.iter().enumerate() {
        if let Some(value) = object.get(param.name()) {
            param
                .check(position, value)
                .map_err(|e| mismatch(format!("field does not round trip: {}", e)))?;
        }
    }

    log::trace!("Probed {} as {}", shape.method, shape.type_name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::Field, flags::UsageFlag};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Deserialize, Serialize)]
    struct Rename {
        old_account: String,
        new_account: String,
    }

    impl Command for Rename {
        fn fields() -> Vec<Field> {
            vec![
                Field::required::<String>("old_account"),
                Field::required::<String>("new_account"),
            ]
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct Misnamed {
        account: String,
    }

    impl Command for Misnamed {
        fn fields() -> Vec<Field> {
            vec![Field::required::<String>("acount")]
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct Lopsided {
        account: String,
        rescan: Option<bool>,
    }

    impl Command for Lopsided {
        fn fields() -> Vec<Field> {
            vec![Field::required::<String>("account")]
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct FloatFee {
        fee: Option<f64>,
    }

    impl Command for FloatFee {
        fn fields() -> Vec<Field> {
            vec![Field::optional::<i64>("fee")]
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct TextIndexes {
        indexes: Vec<String>,
    }

    impl Command for TextIndexes {
        fn fields() -> Vec<Field> {
            vec![Field::required::<Vec<i64>>("indexes")]
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct IntDefault {
        conf_target: Option<f64>,
    }

    impl Command for IntDefault {
        fn fields() -> Vec<Field> {
            vec![Field::optional::<i64>("conf_target").with_default(6)]
        }
    }

    #[test]
    fn build_valid_shape() {
        let shape = build::<Rename>("renameaccount", UsageFlag::WalletOnly.into()).unwrap();

        assert_eq!(shape.method(), "renameaccount");
        assert_eq!(shape.required_count(), 2);
        assert_eq!(shape.max_args(), 2);
        assert!(shape.flags().contains(UsageFlag::WalletOnly));
        assert!(shape.param("new_account").is_some());
        assert!(shape.param("account").is_none());
    }

    #[test]
    fn method_name_is_validated() {
        assert_eq!(
            build::<Rename>("", UsageFlags::empty()).unwrap_err(),
            SchemaError::EmptyMethod
        );
        assert_eq!(
            build::<Rename>("rename account", UsageFlags::empty()).unwrap_err(),
            SchemaError::InvalidMethod("rename account".to_string())
        );
    }

    #[test]
    fn contradictory_flags_fail_the_build() {
        let err = build::<Rename>(
            "renameaccount",
            UsageFlag::WalletOnly | UsageFlag::ChainOnly,
        )
        .unwrap_err();

        assert!(matches!(err, SchemaError::ContradictoryFlags { .. }));
    }

    #[test]
    fn misnamed_field_fails_the_build() {
        let err = build::<Misnamed>("misnamed", UsageFlags::empty()).unwrap_err();

        assert!(matches!(err, SchemaError::FieldsMismatch { .. }), "{}", err);
    }

    #[test]
    fn undeclared_field_fails_the_build() {
        let err = build::<Lopsided>("lopsided", UsageFlags::empty()).unwrap_err();

        match err {
            SchemaError::FieldsMismatch { reason, .. } => {
                assert!(reason.contains("undeclared fields [rescan]"), "{}", reason)
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn float_field_declared_int_fails_the_build() {
        let err = build::<FloatFee>("floatfee", UsageFlags::empty()).unwrap_err();

        match err {
            SchemaError::FieldsMismatch { reason, .. } => {
                assert!(reason.contains("'fee'"), "{}", reason)
            }
            other => panic!("unexpected error: {}", other),
        }

        let err = build::<IntDefault>("intdefault", UsageFlags::empty()).unwrap_err();
        assert!(matches!(err, SchemaError::FieldsMismatch { .. }), "{}", err);
    }

    #[test]
    fn array_items_are_checked() {
        let err = build::<TextIndexes>("textindexes", UsageFlags::empty()).unwrap_err();

        match err {
            SchemaError::FieldsMismatch { reason, .. } => {
                assert!(reason.starts_with("sample values do not decode"), "{}", reason)
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}

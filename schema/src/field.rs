//! Field declarations and the classifier that turns them into parameter descriptors.
//!
//! A command declares its positional parameters as a list of `Field`s, in wire order:
//!
//! ```
//! use jsoncmd_schema::Field;
//!
//! let fields = vec![
//!     Field::required::<String>("address"),
//!     Field::required::<String>("account"),
//!     Field::optional::<bool>("rescan").with_default(true),
//! ];
//! ```
//!
//! `classify` validates such a list and resolves every optional field to its default value.

use std::collections::HashSet;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{DecodeError, SchemaError},
    types::{ParamKind, ParamType, json_kind},
};

/// Strict decode of a JSON value into the Rust type behind a field.
pub type TypeCheck = fn(&Value) -> Result<(), serde_json::Error>;

fn decodes_as<T: DeserializeOwned>(value: &Value) -> Result<(), serde_json::Error> {
    T::deserialize(value).map(|_| ())
}

/// A positional parameter as declared by a command author.
#[derive(Clone, Debug)]
pub struct Field {
    name: &'static str,
    ty: ParamType,
    optional: bool,
    default: Option<Result<Value, String>>,
    check: TypeCheck,
}

impl Field {
    /// A parameter that must always be present.
    pub fn required<T: ParamKind>(name: &'static str) -> Self {
        Self::new::<T>(name, false)
    }

    /// A parameter that may be omitted. Unless `with_default` is used, an omitted value takes the
    /// zero value of its type.
    pub fn optional<T: ParamKind>(name: &'static str) -> Self {
        Self::new::<T>(name, true)
    }

    /// Explicit default used when the parameter is omitted.
    pub fn with_default<V: Serialize>(mut self, value: V) -> Self {
        self.default = Some(serde_json::to_value(value).map_err(|e| e.to_string()));
        self
    }

    /// Declared name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn new<T: ParamKind>(name: &'static str, optional: bool) -> Self {
        Self {
            name,
            ty: T::param_type(),
            optional,
            default: None,
            check: decodes_as::<T>,
        }
    }

    fn admits(&self, value: &Value) -> bool {
        self.ty.accepts(value) && (self.check)(value).is_ok()
    }
}

/// Whether a parameter must be supplied, and what it defaults to otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Requirement {
    /// Must be supplied.
    Required,
    /// May be omitted; `default` is used instead.
    Optional {
        /// Value used when omitted.
        default: Value,
        /// Whether `default` was declared, as opposed to being the zero value.
        explicit: bool,
    },
}

/// A classified positional parameter.
#[derive(Clone, Debug)]
pub struct ParameterDescriptor {
    name: &'static str,
    ty: ParamType,
    requirement: Requirement,
    check: TypeCheck,
}

impl ParameterDescriptor {
    /// Parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared wire type.
    pub fn param_type(&self) -> &ParamType {
        &self.ty
    }

    /// Required or optional with default.
    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    /// Whether the parameter may be omitted.
    pub fn is_optional(&self) -> bool {
        matches!(self.requirement, Requirement::Optional { .. })
    }

    /// Value used when the parameter is omitted, if it may be.
    pub fn default(&self) -> Option<&Value> {
        match &self.requirement {
            Requirement::Required => None,
            Requirement::Optional { default, .. } => Some(default),
        }
    }

    /// Check a wire value found at `position` against this parameter.
    pub fn check(&self, position: usize, value: &Value) -> Result<(), DecodeError> {
        let mismatch = |received: String| DecodeError::TypeMismatch {
            position,
            field: self.name,
            expected: self.ty.clone(),
            received,
        };

        if !self.ty.accepts(value) {
            return Err(mismatch(json_kind(value).to_string()));
        }

        (self.check)(value).map_err(|e| mismatch(e.to_string()))
    }

    /// A value that is valid for this parameter: its explicit default, or else a sample of its
    /// type. Objects have no sample and use their zero value.
    pub(crate) fn placeholder(&self) -> Value {
        match &self.requirement {
            Requirement::Optional {
                default,
                explicit: true,
            } => default.clone(),
            _ => self
                .ty
                .sample_value()
                .unwrap_or_else(|| self.ty.zero_value()),
        }
    }
}

/// Turn declared fields into parameter descriptors.
///
/// Fails if:
/// - a field name is empty or repeated
/// - a required field follows an optional one
/// - a required field has a default
/// - a default (explicit or zero) is not a valid value of the field
pub fn classify(fields: Vec<Field>) -> Result<Vec<ParameterDescriptor>, SchemaError> {
    let mut descriptors = Vec::with_capacity(fields.len());
    let mut names = HashSet::with_capacity(fields.len());
    let mut first_optional: Option<&'static str> = None;

    for (index, field) in fields.into_iter().enumerate() {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyFieldName { index });
        }
        if !names.insert(field.name) {
            return Err(SchemaError::DuplicateField(field.name));
        }

        let requirement = match (field.optional, &field.default) {
            (false, Some(_)) => return Err(SchemaError::DefaultOnRequired(field.name)),
            (false, None) => {
                if let Some(after) = first_optional {
                    return Err(SchemaError::RequiredAfterOptional {
                        field: field.name,
                        index,
                        after,
                    });
                }
                Requirement::Required
            }
            (true, Some(Err(reason))) => {
                return Err(SchemaError::UnserializableDefault {
                    field: field.name,
                    reason: reason.clone(),
                });
            }
            (true, Some(Ok(default))) => Requirement::Optional {
                default: default.clone(),
                explicit: true,
            },
            (true, None) => Requirement::Optional {
                default: field.ty.zero_value(),
                explicit: false,
            },
        };

        if let Requirement::Optional { default, .. } = &requirement {
            if !field.admits(default) {
                return Err(SchemaError::MismatchedDefault {
                    field: field.name,
                    expected: field.ty.clone(),
                    default: default.clone(),
                });
            }
            first_optional.get_or_insert(field.name);
        }

        descriptors.push(ParameterDescriptor {
            name: field.name,
            ty: field.ty,
            requirement,
            check: field.check,
        });
    }

    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_required_and_optional() {
        let params = classify(vec![
            Field::required::<String>("address"),
            Field::optional::<bool>("rescan").with_default(true),
            Field::optional::<i64>("locktime"),
        ])
        .unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(params[0].requirement(), &Requirement::Required);
        assert_eq!(
            params[1].requirement(),
            &Requirement::Optional {
                default: json!(true),
                explicit: true
            }
        );
        assert_eq!(
            params[2].requirement(),
            &Requirement::Optional {
                default: json!(0),
                explicit: false
            }
        );
        assert_eq!(params[2].param_type(), &ParamType::Int);
    }

    #[test]
    fn required_after_optional_is_rejected() {
        let err = classify(vec![
            Field::required::<String>("a"),
            Field::optional::<i64>("b"),
            Field::required::<String>("c"),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            SchemaError::RequiredAfterOptional {
                field: "c",
                index: 2,
                after: "b"
            }
        );
    }

    #[test]
    fn default_on_required_is_rejected() {
        let err = classify(vec![Field::required::<bool>("sign").with_default(true)]).unwrap_err();

        assert_eq!(err, SchemaError::DefaultOnRequired("sign"));
    }

    #[test]
    fn mismatched_default_is_rejected() {
        let err = classify(vec![Field::optional::<bool>("rescan").with_default("yes")]).unwrap_err();

        assert_eq!(
            err,
            SchemaError::MismatchedDefault {
                field: "rescan",
                expected: ParamType::Bool,
                default: json!("yes")
            }
        );
    }

    #[test]
    fn out_of_range_default_is_rejected() {
        let err = classify(vec![Field::optional::<u32>("count").with_default(-1)]).unwrap_err();

        assert!(matches!(err, SchemaError::MismatchedDefault { field: "count", .. }));
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let err = classify(vec![
            Field::required::<String>("a"),
            Field::required::<String>("a"),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateField("a"));

        let err = classify(vec![Field::required::<String>("")]).unwrap_err();
        assert_eq!(err, SchemaError::EmptyFieldName { index: 0 });
    }

    #[test]
    fn check_reports_position_and_kind() {
        let params = classify(vec![
            Field::required::<String>("psbt"),
            Field::optional::<u32>("conf_target"),
        ])
        .unwrap();

        assert!(params[0].check(0, &json!("cHNidP8B")).is_ok());
        assert_eq!(
            params[0].check(0, &json!(12)),
            Err(DecodeError::TypeMismatch {
                position: 0,
                field: "psbt",
                expected: ParamType::String,
                received: "number".to_string()
            })
        );
        assert!(matches!(
            params[1].check(1, &json!(-3)),
            Err(DecodeError::TypeMismatch { position: 1, field: "conf_target", .. })
        ));
    }
}

//! Declared parameter types.
//!
//! Every positional parameter has a declared `ParamType`, which decides three things: which JSON
//! values are accepted on the wire, what the implicit (zero) default is, and how the parameter is
//! rendered in usage text. Rust types map onto a `ParamType` through the `ParamKind` trait.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

/// The type of a positional parameter, as seen on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamType {
    /// Any JSON string.
    String,
    /// A JSON string whose contents parse as a finite number.
    NumericString,
    /// `true` or `false`.
    Bool,
    /// An integral JSON number.
    Int,
    /// Any JSON number.
    Float,
    /// A JSON array whose items all have the inner type.
    Array(Box<ParamType>),
    /// A JSON object whose values all have the inner type.
    Map(Box<ParamType>),
    /// A JSON object with a fixed set of members, like an options struct.
    Object,
}

impl ParamType {
    /// The value an optional parameter takes when omitted and no explicit default was declared.
    pub fn zero_value(&self) -> Value {
        match self {
            ParamType::String => Value::String(String::new()),
            ParamType::NumericString => Value::String("0".to_string()),
            ParamType::Bool => Value::Bool(false),
            ParamType::Int => Value::from(0),
            ParamType::Float => Value::from(0.0),
            ParamType::Array(_) => Value::Array(Vec::new()),
            ParamType::Map(_) | ParamType::Object => Value::Object(Map::new()),
        }
    }

    /// A value of this type that tells Rust types apart where the zero value cannot: `1` is not a
    /// float, `0.5` is not an integer and containers hold one sampled item. `None` for objects,
    /// whose members are only known to the Rust type.
    pub fn sample_value(&self) -> Option<Value> {
        let value = match self {
            ParamType::String => Value::String("sample".to_string()),
            ParamType::NumericString => Value::String("1".to_string()),
            ParamType::Bool => Value::Bool(true),
            ParamType::Int => Value::from(1),
            ParamType::Float => Value::from(0.5),
            ParamType::Array(item) => Value::Array(item.sample_value().into_iter().collect()),
            ParamType::Map(item) => Value::Object(
                item.sample_value()
                    .map(|x| ("sample".to_string(), x))
                    .into_iter()
                    .collect(),
            ),
            ParamType::Object => return None,
        };

        Some(value)
    }

    /// Whether a JSON value has this type. There is no coercion between JSON kinds: a string is
    /// never accepted where a number is expected.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ParamType::String, Value::String(_)) => true,
            (ParamType::NumericString, Value::String(s)) => is_numeric(s),
            (ParamType::Bool, Value::Bool(_)) => true,
            (ParamType::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (ParamType::Float, Value::Number(_)) => true,
            (ParamType::Array(item), Value::Array(items)) => items.iter().all(|x| item.accepts(x)),
            (ParamType::Map(item), Value::Object(entries)) => {
                entries.values().all(|x| item.accepts(x))
            }
            (ParamType::Object, Value::Object(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::String => f.write_str("string"),
            ParamType::NumericString => f.write_str("numeric string"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::Int => f.write_str("int"),
            ParamType::Float => f.write_str("float"),
            ParamType::Array(item) => write!(f, "array of {}", item),
            ParamType::Map(item) => write!(f, "map of {}", item),
            ParamType::Object => f.write_str("object"),
        }
    }
}

/// Name of the JSON kind of a value, used in error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Compare two JSON values the way defaults are compared: numbers by value, so that `0` and
/// `0.0` are the same default. Two integers are compared exactly.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => {
            match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

pub(crate) fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.trim() == s && f64::from_str(s).is_ok_and(f64::is_finite)
}

/// Rust types that can be used as a positional parameter.
pub trait ParamKind: Serialize + DeserializeOwned {
    /// The declared wire type.
    fn param_type() -> ParamType;
}

macro_rules! param_kind {
    ($ty:ident => $($t:ty),+ $(,)?) => {
        $(
            impl ParamKind for $t {
                fn param_type() -> ParamType {
                    ParamType::$ty
                }
            }
        )+
    };
}

param_kind!(String => String);
param_kind!(Bool => bool);
param_kind!(Int => i32, i64, u32, u64);
param_kind!(Float => f32, f64);

impl<T: ParamKind> ParamKind for Vec<T> {
    fn param_type() -> ParamType {
        ParamType::Array(Box::new(T::param_type()))
    }
}

impl<T: ParamKind> ParamKind for BTreeMap<String, T> {
    fn param_type() -> ParamType {
        ParamType::Map(Box::new(T::param_type()))
    }
}

impl<T: ParamKind> ParamKind for HashMap<String, T> {
    fn param_type() -> ParamType {
        ParamType::Map(Box::new(T::param_type()))
    }
}

/// A number carried as a JSON string, e.g. an amount that must not lose precision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NumericString(String);

/// Error returned when building a `NumericString` out of a non-numeric string.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0:?} is not a number")]
pub struct NotNumeric(pub String);

impl NumericString {
    /// Wrap a string, checking that it holds a finite number.
    pub fn new<S: Into<String>>(s: S) -> Result<Self, NotNumeric> {
        let s = s.into();
        if is_numeric(&s) {
            Ok(Self(s))
        } else {
            Err(NotNumeric(s))
        }
    }

    /// The number as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the number into any `FromStr` type.
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        self.0.parse()
    }
}

impl Default for NumericString {
    fn default() -> Self {
        Self("0".to_string())
    }
}

impl TryFrom<String> for NumericString {
    type Error = NotNumeric;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<NumericString> for String {
    fn from(n: NumericString) -> Self {
        n.0
    }
}

impl From<i64> for NumericString {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for NumericString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ParamKind for NumericString {
    fn param_type() -> ParamType {
        ParamType::NumericString
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_is_strict() {
        assert!(ParamType::Int.accepts(&json!(5)));
        assert!(!ParamType::Int.accepts(&json!("5")));
        assert!(!ParamType::Int.accepts(&json!(5.5)));
        assert!(ParamType::Float.accepts(&json!(5)));
        assert!(!ParamType::Bool.accepts(&json!("true")));
        assert!(!ParamType::String.accepts(&json!(null)));
        assert!(ParamType::NumericString.accepts(&json!("12.5")));
        assert!(!ParamType::NumericString.accepts(&json!(12.5)));
        assert!(!ParamType::NumericString.accepts(&json!("abc")));
        assert!(!ParamType::NumericString.accepts(&json!(" 1")));
        assert!(!ParamType::NumericString.accepts(&json!("NaN")));
    }

    #[test]
    fn accepts_checks_nested_items() {
        let outputs = <Vec<BTreeMap<String, f64>>>::param_type();
        assert_eq!(
            outputs,
            ParamType::Array(Box::new(ParamType::Map(Box::new(ParamType::Float))))
        );
        assert!(outputs.accepts(&json!([{"addr": 1.5}, {}])));
        assert!(!outputs.accepts(&json!([{"addr": "1.5"}])));
        assert!(!outputs.accepts(&json!({"addr": 1.5})));
    }

    #[test]
    fn zero_values_have_their_own_type() {
        let types = [
            ParamType::String,
            ParamType::NumericString,
            ParamType::Bool,
            ParamType::Int,
            ParamType::Float,
            ParamType::Array(Box::new(ParamType::Int)),
            ParamType::Map(Box::new(ParamType::Float)),
            ParamType::Object,
        ];
        for ty in &types {
            assert!(ty.accepts(&ty.zero_value()), "{}", ty);
        }
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(values_equal(&json!(0), &json!(0.0)));
        assert!(values_equal(&json!({"a": [1]}), &json!({"a": [1.0]})));
        assert!(!values_equal(&json!(0), &json!(false)));
        assert!(!values_equal(&json!({"a": 1}), &json!({"b": 1})));
    }

    #[test]
    fn large_integers_compare_exactly() {
        assert!(!values_equal(&json!(u64::MAX), &json!(u64::MAX - 1)));
        assert!(!values_equal(&json!(i64::MIN), &json!(i64::MIN + 1)));
        assert!(!values_equal(&json!(u64::MAX), &json!(-1)));
        assert!(values_equal(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(values_equal(&json!(1), &json!(1.0)));
    }

    #[test]
    fn samples_have_their_own_type() {
        let types = [
            ParamType::String,
            ParamType::NumericString,
            ParamType::Bool,
            ParamType::Int,
            ParamType::Float,
            ParamType::Array(Box::new(ParamType::Int)),
            ParamType::Map(Box::new(ParamType::Float)),
        ];
        for ty in &types {
            assert!(ty.accepts(&ty.sample_value().unwrap()), "{}", ty);
        }

        assert!(!ParamType::Int.accepts(&ParamType::Float.sample_value().unwrap()));
        assert_eq!(
            ParamType::Array(Box::new(ParamType::Object)).sample_value(),
            Some(json!([]))
        );
        assert_eq!(ParamType::Object.sample_value(), None);
    }

    #[test]
    fn display_nested_type() {
        let ty = <Vec<BTreeMap<String, f64>>>::param_type();
        assert_eq!(ty.to_string(), "array of map of float");
    }

    #[test]
    fn numeric_string_rejects_text() {
        assert_eq!(NumericString::new("0.001").unwrap().as_str(), "0.001");
        assert_eq!(
            NumericString::new("ten"),
            Err(NotNumeric("ten".to_string()))
        );
        let n: NumericString = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(n.parse::<u32>(), Ok(42));
        assert!(serde_json::from_value::<NumericString>(json!("x")).is_err());
        assert!(serde_json::from_value::<NumericString>(json!(42)).is_err());
    }
}

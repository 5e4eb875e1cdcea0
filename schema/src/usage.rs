//! One-line usage text.

use crate::{
    field::{ParameterDescriptor, Requirement},
    shape::CommandShape,
    types::ParamType,
};

/// Render `method req1 req2 (opt1 opt2=default)`.
pub(crate) fn render(shape: &CommandShape) -> String {
    let (required, optional): (Vec<_>, Vec<_>) =
        shape.params().iter().partition(|p| !p.is_optional());

    let mut parts = vec![shape.method().to_string()];
    parts.extend(required.into_iter().map(placeholder));
    if !optional.is_empty() {
        let optional: Vec<String> = optional.into_iter().map(optional_placeholder).collect();
        parts.push(format!("({})", optional.join(" ")));
    }

    parts.join(" ")
}

fn placeholder(param: &ParameterDescriptor) -> String {
    let name = param.name();
    match param.param_type() {
        ParamType::String | ParamType::NumericString => format!("\"{}\"", name),
        ParamType::Array(_) => format!("[{},...]", name),
        ParamType::Map(_) | ParamType::Object => format!("{{{}}}", name),
        ParamType::Bool | ParamType::Int | ParamType::Float => name.to_string(),
    }
}

fn optional_placeholder(param: &ParameterDescriptor) -> String {
    match param.requirement() {
        Requirement::Optional {
            default,
            explicit: true,
        } => format!("{}={}", param.name(), default),
        _ => placeholder(param),
    }
}

#[cfg(test)]
mod tests {
    use crate::{command::Command, field::Field, flags::UsageFlags, shape::build};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Debug, Deserialize, Serialize)]
    struct Everything {
        address: String,
        inputs: Vec<i64>,
        options: Option<BTreeMap<String, f64>>,
        rescan: Option<bool>,
        sighash_type: Option<String>,
        locktime: Option<i64>,
    }

    impl Command for Everything {
        fn fields() -> Vec<Field> {
            vec![
                Field::required::<String>("address"),
                Field::required::<Vec<i64>>("inputs"),
                Field::optional::<BTreeMap<String, f64>>("options"),
                Field::optional::<bool>("rescan").with_default(true),
                Field::optional::<String>("sighash_type").with_default("ALL"),
                Field::optional::<i64>("locktime"),
            ]
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    struct Nothing {}

    impl Command for Nothing {
        fn fields() -> Vec<Field> {
            vec![]
        }
    }

    #[test]
    fn renders_every_kind() {
        let shape = build::<Everything>("everything", UsageFlags::empty()).unwrap();

        assert_eq!(
            shape.usage(),
            r#"everything "address" [inputs,...] ({options} rescan=true sighash_type="ALL" locktime)"#
        );
    }

    #[test]
    fn renders_bare_method() {
        let shape = build::<Nothing>("getinfo", UsageFlags::empty()).unwrap();

        assert_eq!(shape.usage(), "getinfo");
    }
}

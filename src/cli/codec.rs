use std::io::{self, Read};

use anyhow::bail;
use serde_json::{Value, json};

use jsoncmd_schema::{BoxedCommand, Error, Registry, parse_cli_args, types::json_kind};

use super::arguments;

/// Argument standing for the contents of stdin.
const STDIN_ARG: &str = "-";

pub(crate) fn encode_from_args(
    registry: &Registry,
    args: arguments::Encode,
) -> Result<(), anyhow::Error> {
    let request = encode(registry, &args.method, &args.args, io::stdin().lock())?;
    println!("{}", serde_json::to_string(&request)?);

    Ok(())
}

pub(crate) fn decode_from_args(
    registry: &Registry,
    args: arguments::Decode,
) -> Result<(), anyhow::Error> {
    let (command, params) = decode(registry, &args.method, &args.params)?;
    println!("{:#?}", command);
    println!("{}", serde_json::to_string(&params)?);

    Ok(())
}

/// Convert command-line arguments of `method` into a `{"method", "params"}` request, with trailing
/// defaults trimmed off.
fn encode<R: Read>(
    registry: &Registry,
    method: &str,
    args: &[String],
    mut input: R,
) -> Result<Value, anyhow::Error> {
    let shape = registry.lookup(method)?;

    let mut stdin = None;
    let mut texts = Vec::with_capacity(args.len());
    for arg in args {
        if arg == STDIN_ARG {
            if stdin.is_none() {
                let mut contents = String::new();
                input.read_to_string(&mut contents)?;
                stdin = Some(contents.trim_end_matches(['\r', '\n']).to_string());
            }
            texts.push(stdin.clone().unwrap_or_default());
        } else {
            texts.push(arg.clone());
        }
    }

    let params = parse_cli_args(&texts, shape).map_err(|source| Error::Decode {
        method: method.to_string(),
        source,
    })?;
    let command = registry.unmarshal(method, &params)?;
    log::debug!("Encoding {:?}", command);
    let (method, params) = registry.marshal_any(&*command)?;

    Ok(json!({ "method": method, "params": params }))
}

/// Strictly decode the JSON `params` of `method`. Returns the command along with its normalized
/// params.
fn decode(
    registry: &Registry,
    method: &str,
    params: &str,
) -> Result<(BoxedCommand, Vec<Value>), anyhow::Error> {
    let params = match serde_json::from_str::<Value>(params)? {
        Value::Array(params) => params,
        other => bail!("params must be a JSON array, not {}", json_kind(&other)),
    };

    let command = registry.unmarshal(method, &params)?;
    let (_, normalized) = registry.marshal_any(&*command)?;

    Ok((command, normalized))
}

//! Arguments of the CLI subcommands.

use structopt::StructOpt;

use jsoncmd_schema::UsageFlag;

#[derive(Debug, StructOpt)]
pub(crate) struct List {
    /// Only list methods having this flag (wallet-only, chain-only, websocket-only,
    /// notification). Can be repeated.
    #[structopt(long = "with", number_of_values = 1)]
    pub with: Vec<UsageFlag>,
    /// Leave out methods having this flag. Can be repeated.
    #[structopt(long = "without", number_of_values = 1)]
    pub without: Vec<UsageFlag>,
    /// Only list methods exposed by the configured server.
    #[structopt(long = "exposed")]
    pub exposed: bool,
}

#[derive(Debug, StructOpt)]
pub(crate) struct Usage {
    #[structopt(name = "METHOD")]
    pub method: String,
}

#[derive(Debug, StructOpt)]
pub(crate) struct Encode {
    #[structopt(name = "METHOD")]
    pub method: String,
    /// Positional arguments, as text. JSON is expected for arrays and objects. An argument of `-`
    /// is read from stdin.
    #[structopt(name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Debug, StructOpt)]
pub(crate) struct Decode {
    #[structopt(name = "METHOD")]
    pub method: String,
    /// JSON array of positional params, e.g. '["1Address", "account"]'.
    #[structopt(name = "PARAMS_JSON")]
    pub params: String,
}

use std::{env, path::PathBuf};

use lazy_static::lazy_static;
use structopt::StructOpt;
use terminal_size as term;

use jsoncmd_config as config;

mod arguments;
mod codec;
mod introspect;

pub fn from_args() -> Cli {
    Cli::from_args()
}

/// Run the CLI. Output goes to `stdout` and a `0` exit code is returned; on failure the error
/// goes to `stderr` and the exit code is `1`.
pub fn process_command(command: Cli) -> i32 {
    exec(command).map(|()| 0).unwrap_or_else(|error| {
        eprintln!("Error: {:#}", error);

        1
    })
}

fn exec(command: Cli) -> Result<(), anyhow::Error> {
    let Cli {
        config,
        debug,
        trace,
        no_timestamp,
        no_module_path,
        cmd,
    } = command;

    let mut log_opts = LogOptions::default();
    let config_path = config.or_else(config::dirs::find_config);
    let config = get_config(config_path.clone())?;

    log_opts.level = config.log.level;
    log_opts.source = LogOptionsSource::Config;
    log_opts.timestamp = !no_timestamp;
    log_opts.module_path = !no_module_path;

    if let Ok(rust_log) = env::var("RUST_LOG") {
        if rust_log.contains("jsoncmd") {
            log_opts.level = env_logger::Logger::from_default_env().filter();
            log_opts.source = LogOptionsSource::Env;
        }
    }

    if trace {
        log_opts.level = log::LevelFilter::Trace;
        log_opts.source = LogOptionsSource::Flag;
    } else if debug {
        log_opts.level = log::LevelFilter::Debug;
        log_opts.source = LogOptionsSource::Flag;
    }

    init_logger(log_opts);
    match config_path {
        Some(path) => log::debug!("Loaded config from: {}", path.display()),
        None => log::debug!("No configuration specified/found, using the default one"),
    }

    exec_cmd(cmd, config)
}

fn exec_cmd(command: Command, config: config::Config) -> Result<(), anyhow::Error> {
    let registry = jsoncmd_commands::registry();

    match command {
        Command::List(args) => introspect::list(&registry, args, &config),
        Command::Usage(args) => introspect::usage(&registry, args),
        Command::Encode(args) => codec::encode_from_args(&registry, args),
        Command::Decode(args) => codec::decode_from_args(&registry, args),
    }
}

fn init_logger(opts: LogOptions) {
    let timestamp = if opts.timestamp {
        Some(env_logger::fmt::TimestampPrecision::Seconds)
    } else {
        None
    };

    env_logger::Builder::from_env(env_logger::Env::default())
        .format_timestamp(timestamp)
        .format_module_path(opts.module_path)
        .filter_level(log::LevelFilter::Warn)
        .filter_module("jsoncmd", opts.level)
        .init();

    log::debug!(
        "Setting log level to: {}, source: {:?}",
        opts.level,
        opts.source
    );
}

fn get_config(path: Option<PathBuf>) -> Result<config::Config, anyhow::Error> {
    match path {
        Some(p) => {
            let partial = config::loaders::toml::from_file(&p)
                .map_err(|e| anyhow::anyhow!("{}: {}", p.display(), e))?;

            Ok(config::Config::from_partial(&partial))
        }
        None => Ok(config::Config::default()),
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "jsoncmd", max_term_width = *TERM_WIDTH)]
pub struct Cli {
    #[structopt(short = "c", long = "config", help = CONFIG_HELP)]
    config: Option<PathBuf>,
    /// Turn on DEBUG logging.
    #[structopt(long = "debug")]
    debug: bool,
    /// Turn on TRACE logging.
    #[structopt(long = "trace")]
    trace: bool,
    /// Do not show timestamps in logs.
    #[structopt(long = "no-timestamp")]
    no_timestamp: bool,
    /// Do not show module path in logs.
    #[structopt(long = "no-module-path")]
    no_module_path: bool,
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    #[structopt(name = "list", about = "List registered methods.")]
    List(arguments::List),
    #[structopt(name = "usage", about = "Show the usage line of a method.")]
    Usage(arguments::Usage),
    #[structopt(
        name = "encode",
        about = "Build the positional params of a method out of command-line arguments."
    )]
    Encode(arguments::Encode),
    #[structopt(
        name = "decode",
        about = "Strictly decode the positional params of a method."
    )]
    Decode(arguments::Decode),
}

struct LogOptions {
    level: log::LevelFilter,
    timestamp: bool,
    module_path: bool,
    source: LogOptionsSource,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: log::LevelFilter::Error,
            timestamp: true,
            module_path: true,
            source: LogOptionsSource::Defaults,
        }
    }
}

#[derive(Debug)]
enum LogOptionsSource {
    Defaults,
    Config,
    Env,
    Flag,
}

lazy_static! {
    static ref TERM_WIDTH: usize =
        term::terminal_size().map_or(120, |(term::Width(w), _)| usize::from(w));
}

static CONFIG_HELP: &str = r#"TOML file holding the log level and the method groups exposed by the server
(`list --exposed`). Without this option, the first `jsoncmd.toml` found in the current
directory, then in the user configuration directory (e.g. ~/.config/jsoncmd), then in
/etc/jsoncmd on Unix, is used. Built-in settings apply when none is found."#;

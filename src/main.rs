//! `jsoncmd`: offline encoder and decoder for positional JSON-RPC commands.

#![deny(rust_2018_idioms)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]

mod cli;

fn main() {
    let exit_code = cli::process_command(cli::from_args());
    std::process::exit(exit_code);
}

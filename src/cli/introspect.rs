use ansi_term::Color::{White, Yellow};
use prettytable::{cell, row, Table};

use jsoncmd_config::Config;
use jsoncmd_schema::{FlagFilter, ParameterDescriptor, Registry};

use super::arguments;

pub(crate) fn list(
    registry: &Registry,
    args: arguments::List,
    config: &Config,
) -> Result<(), anyhow::Error> {
    let filter = list_filter(&args, config);
    let table = commands_table(registry, filter);

    if table.len() == 0 {
        println!("No method matches the given flags.");
    } else {
        table.printstd();
        println!();
        println!(
            "{} of {} registered methods.",
            Yellow.bold().paint(table.len().to_string()),
            registry.len()
        );
    }

    Ok(())
}

pub(crate) fn usage(registry: &Registry, args: arguments::Usage) -> Result<(), anyhow::Error> {
    let shape = registry.lookup(&args.method)?;

    println!("{}", shape.usage());
    for param in shape.params() {
        println!("{}", param_line(param));
    }

    Ok(())
}

/// `  name  type (requirement)`, with names padded to a common width before they are painted.
fn param_line(param: &ParameterDescriptor) -> String {
    let requirement = match param.default() {
        None => "required".to_string(),
        Some(default) => format!("optional, default {}", default),
    };

    format!(
        "  {} {} ({})",
        White.bold().paint(format!("{:<16}", param.name())),
        param.param_type(),
        requirement
    )
}

fn list_filter(args: &arguments::List, config: &Config) -> FlagFilter {
    let filter = if args.exposed {
        config.exposure.flag_filter()
    } else {
        FlagFilter::all()
    };
    let filter = args.with.iter().fold(filter, |filter, flag| filter.with(*flag));

    args.without
        .iter()
        .fold(filter, |filter, flag| filter.without(*flag))
}

fn commands_table(registry: &Registry, filter: FlagFilter) -> Table {
    let mut table = Table::new();
    table.set_format(*prettytable::format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["Method", "Flags", "Usage"]);
    for (method, shape) in registry.enumerate(filter) {
        table.add_row(row![method, shape.flags(), shape.usage()]);
    }

    table
}

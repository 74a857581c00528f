//! Tool flags: turns a tool's [`ArgSpec`] list into a clap command at runtime and parses
//! the trailing `-- ...` arguments into [`ToolArgs`].
//!
//! Choices are not enforced by clap so that the tool's own validation reports the
//! field and accepted set.

use crate::error::ValidationError;
use crate::tool::{ArgKind, ArgSpec, ToolArgs};
use clap::{Arg, ArgAction, Command};

/// Build a clap command exposing every tool flag as `--<name>`
pub fn build_command(tool_name: &str, specs: &[ArgSpec]) -> Command {
    specs.iter().fold(
        Command::new(tool_name.to_string())
            .no_binary_name(true)
            .disable_help_flag(true),
        |command, spec| command.arg(to_arg(spec)),
    )
}

fn to_arg(spec: &ArgSpec) -> Arg {
    let arg = Arg::new(spec.name.clone())
        .long(spec.name.clone())
        .help(help_text(spec));
    match spec.kind {
        ArgKind::Flag => arg.action(ArgAction::SetTrue),
        kind => arg
            .action(ArgAction::Set)
            .value_name(value_name(kind))
            .allow_negative_numbers(true),
    }
}

fn value_name(kind: ArgKind) -> &'static str {
    match kind {
        ArgKind::Integer => "INT",
        ArgKind::Float => "NUM",
        _ => "VALUE",
    }
}

/// Help line with default and accepted values appended
pub fn help_text(spec: &ArgSpec) -> String {
    let mut help = spec.help.clone();
    if !spec.choices.is_empty() {
        help.push_str(&format!(" [one of: {}]", spec.choices.join(", ")));
    }
    if let Some(default) = &spec.default {
        help.push_str(&format!(" [default: {}]", default));
    }
    help
}

/// Parse raw tool flags; flags the user did not pass are left out so tool defaults apply
pub fn parse_tool_args(
    tool_name: &str,
    specs: &[ArgSpec],
    raw: &[String],
) -> Result<ToolArgs, ValidationError> {
    let matches = build_command(tool_name, specs)
        .try_get_matches_from(raw)
        .map_err(|e| {
            ValidationError::new(
                "tool arguments",
                e.render().to_string().trim().to_string(),
            )
        })?;

    let mut args = ToolArgs::new();
    for spec in specs {
        match spec.kind {
            ArgKind::Flag => {
                if matches.get_flag(&spec.name) {
                    args.insert(&spec.name, true);
                }
            }
            _ => {
                if let Some(value) = matches.get_one::<String>(&spec.name) {
                    args.insert(&spec.name, value);
                }
            }
        }
    }
    Ok(args)
}

//! CLI domain: parse, route, help, output, tool flags and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;
mod tool_args;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, GenerateArgs, ToolsCommands};
pub use presentation::{
    format_run_summary_json, format_run_summary_text, format_tool_list_json,
    format_tool_list_text, format_tool_show_json, format_tool_show_text,
};
pub use route::{CommandOutput, RunContext, EXIT_TASK_FAILURES};
pub use tool_args::{build_command, parse_tool_args};

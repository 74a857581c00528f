//! CLI command-name contract used in log fields.

use crate::cli::parse::{Commands, ToolsCommands};

/// Command name string for logging (e.g. "tools.list", "generate").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Tools { command } => format!("tools.{}", tools_command_name(command)),
        Commands::Generate(_) => "generate".to_string(),
    }
}

pub fn tools_command_name(command: &ToolsCommands) -> &'static str {
    match command {
        ToolsCommands::List { .. } => "list",
        ToolsCommands::Show { .. } => "show",
    }
}

//! CLI presentation: text and json formatters for tool listings and run summaries.

use crate::error::ApiError;
use crate::orchestrator::{Outcome, RunSummary};
use crate::tool::GeneratorTool;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

use crate::cli::tool_args::help_text;

fn section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn to_pretty_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::Runtime(format!("Failed to render json: {}", e)))
}

fn formats_of(tool: &dyn GeneratorTool) -> Vec<String> {
    tool.supported_output_formats()
        .iter()
        .map(ToString::to_string)
        .collect()
}

pub fn format_tool_list_text(tools: &[Box<dyn GeneratorTool>]) -> String {
    if tools.is_empty() {
        return "No tools registered.".to_string();
    }
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_header(vec!["Name", "Prefix", "Description"]);
    for tool in tools {
        table.add_row(vec![
            tool.scenario_name(),
            tool.artifact_prefix(),
            tool.description(),
        ]);
    }
    format!("{}\n\nTotal: {} tool(s)", table, tools.len())
}

pub fn format_tool_list_json(tools: &[Box<dyn GeneratorTool>]) -> Result<String, ApiError> {
    let entries: Vec<serde_json::Value> = tools
        .iter()
        .map(|tool| {
            json!({
                "name": tool.scenario_name(),
                "prefix": tool.artifact_prefix(),
                "description": tool.description(),
            })
        })
        .collect();
    to_pretty_json(&json!({ "tools": entries, "total": tools.len() }))
}

pub fn format_tool_show_text(tool: &dyn GeneratorTool) -> String {
    let mut out = format!(
        "{}\n  Name: {}\n  Prefix: {}\n  Description: {}\n  Formats: {}",
        section_heading("Tool"),
        tool.scenario_name(),
        tool.artifact_prefix(),
        tool.description(),
        formats_of(tool).join(", ")
    );

    let specs = tool.cli_arguments();
    out.push_str(&format!("\n\n{}", section_heading("Arguments")));
    if specs.is_empty() {
        out.push_str("\n  (none)");
    } else {
        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_FULL)
            .set_header(vec!["Flag", "Type", "Help"]);
        for spec in &specs {
            table.add_row(vec![
                format!("--{}", spec.name),
                format!("{:?}", spec.kind).to_lowercase(),
                help_text(spec),
            ]);
        }
        out.push_str(&format!("\n{}", table));
    }

    let examples = tool.examples();
    if !examples.is_empty() {
        out.push_str(&format!("\n\n{}", section_heading("Examples")));
        for example in &examples {
            out.push_str(&format!("\n  {}", example));
        }
    }
    out
}

pub fn format_tool_show_json(tool: &dyn GeneratorTool) -> Result<String, ApiError> {
    to_pretty_json(&json!({
        "name": tool.scenario_name(),
        "prefix": tool.artifact_prefix(),
        "description": tool.description(),
        "formats": formats_of(tool),
        "arguments": tool.cli_arguments(),
        "examples": tool.examples(),
    }))
}

pub fn format_run_summary_text(tool_name: &str, summary: &RunSummary) -> String {
    let status = if summary.is_success() {
        format!("{}", "completed".green())
    } else {
        format!("{}", "completed with failures".red())
    };
    let mut out = format!(
        "{}\n  Tool: {}\n  Status: {}\n  Attempted: {}\n  Succeeded: {}\n  Failed: {}\n  Elapsed: {:.2}s",
        section_heading("Run summary"),
        tool_name,
        status,
        summary.attempted(),
        summary.succeeded(),
        summary.failed(),
        summary.elapsed().as_secs_f64()
    );

    if !summary.failures().is_empty() {
        let mut table = Table::new();
        table
            .load_preset(comfy_table::presets::UTF8_FULL)
            .set_header(vec!["Task", "Id", "Outcome", "Attempts", "Detail"]);
        for report in summary.failures() {
            let detail = match &report.outcome {
                Outcome::BackendFailed { cause }
                | Outcome::PersistFailed { cause } => cause.clone(),
                _ => String::new(),
            };
            table.add_row(vec![
                report.index.to_string(),
                report.unique_id.clone(),
                report.outcome.label().to_string(),
                report.attempts.to_string(),
                detail,
            ]);
        }
        out.push_str(&format!("\n\n{}\n{}", section_heading("Failures"), table));
    }
    out
}

pub fn format_run_summary_json(tool_name: &str, summary: &RunSummary) -> Result<String, ApiError> {
    let mut value = serde_json::to_value(summary)
        .map_err(|e| ApiError::Runtime(format!("Failed to render json: {}", e)))?;
    if let Some(object) = value.as_object_mut() {
        object.insert("tool".to_string(), json!(tool_name));
    }
    to_pretty_json(&value)
}

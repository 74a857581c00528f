//! Generator tool contract.
//!
//! A generator tool owns everything domain-specific about one scenario: the flags it
//! wants exposed, how those flags are normalized, the prompt sent to the backend, and
//! how raw backend text becomes an [`Artifact`]. The orchestrator only sees this trait.

use crate::error::ValidationError;
use crate::types::{Artifact, OutputFormat};
use serde::Serialize;
use std::collections::BTreeMap;

pub mod schema;

/// Value type of a tool flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgKind {
    String,
    Integer,
    Float,
    Flag,
}

/// A flag a tool wants the CLI layer to expose
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgSpec {
    /// Flag name without leading dashes (e.g. `positive_pct`)
    pub name: String,
    pub help: String,
    pub kind: ArgKind,
    pub default: Option<String>,
    /// Accepted values for enumerated flags; empty means free-form
    pub choices: Vec<String>,
}

impl ArgSpec {
    pub fn new(name: &str, kind: ArgKind, help: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            kind,
            default: None,
            choices: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: impl ToString) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }
}

/// Parsed tool configuration handed to [`GeneratorTool::validate_args`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    values: BTreeMap<String, String>,
}

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl ToString) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Result<Option<i64>, ValidationError> {
        self.get_str(name)
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|_| {
                    ValidationError::new(name, format!("expected an integer, got '{}'", raw))
                })
            })
            .transpose()
    }

    pub fn get_f64(&self, name: &str) -> Result<Option<f64>, ValidationError> {
        self.get_str(name)
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| {
                        ValidationError::new(name, format!("expected a number, got '{}'", raw))
                    })
            })
            .transpose()
    }

    pub fn get_flag(&self, name: &str) -> bool {
        self.get_str(name)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: ToString, V: ToString> FromIterator<(K, V)> for ToolArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Per-scenario domain logic driven by the orchestrator
///
/// `validate_args` is the only method that mutates a tool and is called once, before
/// the tool is shared (behind an `Arc`) with concurrently running tasks.
pub trait GeneratorTool: Send + Sync {
    /// Unique registry name
    fn scenario_name(&self) -> &str;

    /// Filename prefix for persisted artifacts
    fn artifact_prefix(&self) -> &str;

    fn description(&self) -> &str;

    /// Example invocations shown by `tools show`
    fn examples(&self) -> Vec<String>;

    /// Flags this tool wants exposed by the CLI
    fn cli_arguments(&self) -> Vec<ArgSpec>;

    /// Normalize and store configuration
    ///
    /// Out-of-range numeric values are clamped where a sane range exists; enumerated
    /// values with no safe default are rejected with the field name and accepted set.
    fn validate_args(&mut self, args: &ToolArgs) -> Result<(), ValidationError>;

    /// Instruction text for one record. Attributes may be picked at random per call.
    fn build_prompt(&self, output_format: &OutputFormat, unique_id: &str) -> String;

    /// Missing top-level fields filled into parsed structured results
    fn enrichment_defaults(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::Map::new()
    }

    /// Interpret raw backend text. Never fails: unparseable input comes back unchanged.
    fn post_process(&self, raw_text: &str, output_format: &OutputFormat) -> Artifact {
        schema::lenient_post_process(raw_text, output_format, &self.enrichment_defaults())
    }

    fn unique_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    fn supported_output_formats(&self) -> Vec<OutputFormat> {
        vec![
            OutputFormat::Json,
            OutputFormat::Yaml,
            OutputFormat::Text,
            OutputFormat::Markdown,
        ]
    }
}

/// Clamp an optional integer flag into `[min, max]`, falling back to `default` when absent
pub fn clamp_i64(
    args: &ToolArgs,
    name: &str,
    min: i64,
    max: i64,
    default: i64,
) -> Result<i64, ValidationError> {
    let value = args.get_i64(name)?.unwrap_or(default);
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!(field = name, value, clamped, "Clamped out-of-range tool argument");
    }
    Ok(clamped)
}

/// Resolve an enumerated flag, rejecting values outside `accepted`
pub fn choose_enum(
    args: &ToolArgs,
    name: &str,
    accepted: &[&str],
    default: &str,
) -> Result<String, ValidationError> {
    let value = args
        .get_str(name)
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_else(|| default.to_string());
    if accepted.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(ValidationError::not_in_set(name, &value, accepted))
    }
}

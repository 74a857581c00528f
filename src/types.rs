//! Shared value types: output formats, artifacts, and backend call options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Requested output format for a generated record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
    Markdown,
    /// Any other format name; artifacts are written as plain strings
    #[serde(untagged)]
    Other(String),
}

impl OutputFormat {
    /// File extension used for persisted artifacts
    pub fn extension(&self) -> &str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Text => "txt",
            OutputFormat::Markdown => "md",
            OutputFormat::Other(name) => name.as_str(),
        }
    }

    /// Whether the backend is expected to return a structured document
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Text => "text",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Other(name) => name.as_str(),
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Json
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "json" => OutputFormat::Json,
            "yaml" | "yml" => OutputFormat::Yaml,
            "text" | "txt" => OutputFormat::Text,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Other(normalized),
        })
    }
}

/// Processed result of one generation task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Artifact {
    /// Parsed structured document (JSON or YAML)
    Structured(serde_json::Value),
    /// Raw text, either a text format or an unparseable structured response
    Text(String),
}

impl Artifact {
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Artifact::Structured(value) => Some(value),
            Artifact::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Artifact::Text(text) => Some(text),
            Artifact::Structured(_) => None,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Structured(value) => write!(f, "{}", value),
            Artifact::Text(text) => f.write_str(text),
        }
    }
}

/// Options passed with each backend call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>, // 0.0-2.0
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_tokens: Some(2048),
            temperature: Some(0.9),
        }
    }
}

//! Format skeletons and lenient parsing shared by generator tools.

use crate::types::{Artifact, OutputFormat};
use serde_json::{Map, Value};

/// One field of a record schema: name plus a short description for the placeholder
pub type SchemaField<'a> = (&'a str, &'a str);

/// Render the schema skeleton the backend should follow for `format`
pub fn skeleton(format: &OutputFormat, fields: &[SchemaField<'_>]) -> String {
    match format {
        OutputFormat::Json => {
            let mut object = Map::new();
            for (name, description) in fields {
                object.insert(name.to_string(), Value::String(format!("<{}>", description)));
            }
            // Serializing a Map of strings cannot fail
            serde_json::to_string_pretty(&Value::Object(object)).unwrap_or_default()
        }
        OutputFormat::Yaml => fields
            .iter()
            .map(|(name, description)| format!("{}: <{}>", name, description))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Markdown => fields
            .iter()
            .map(|(name, description)| format!("## {}\n<{}>", name, description))
            .collect::<Vec<_>>()
            .join("\n\n"),
        OutputFormat::Text | OutputFormat::Other(_) => fields
            .iter()
            .map(|(name, description)| format!("- {}: {}", name, description))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Output instruction appended to every prompt
pub fn format_instruction(format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            "Respond with a single valid JSON object matching this schema and nothing else:".into()
        }
        OutputFormat::Yaml => {
            "Respond with a single block-style YAML document matching this schema and nothing else:"
                .into()
        }
        OutputFormat::Markdown => "Respond in Markdown using these sections:".into(),
        OutputFormat::Text => "Respond in plain prose covering:".into(),
        OutputFormat::Other(name) => format!("Respond in {} format covering:", name),
    }
}

/// Current UTC time for prompt headers
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Remove a surrounding Markdown code fence (```json ... ```), if any
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// Parse `raw` as the requested structured format
///
/// Only documents whose root is a mapping or sequence count as structured; a bare YAML
/// scalar (which any prose would parse as) is treated as a parse failure.
pub fn parse_structured(raw: &str, format: &OutputFormat) -> Option<Value> {
    let body = strip_code_fences(raw);
    let value: Value = match format {
        OutputFormat::Json => serde_json::from_str(body).ok()?,
        OutputFormat::Yaml => serde_yaml::from_str(body).ok()?,
        _ => return None,
    };
    matches!(value, Value::Object(_) | Value::Array(_)).then_some(value)
}

/// Insert each default whose key is absent; never overwrites existing fields
pub fn enrich(value: &mut Value, defaults: &Map<String, Value>) {
    if let Value::Object(object) = value {
        for (key, default) in defaults {
            object.entry(key.clone()).or_insert_with(|| default.clone());
        }
    }
}

/// Parse, then enrich; any parse failure returns the raw text unchanged
pub fn lenient_post_process(
    raw: &str,
    format: &OutputFormat,
    defaults: &Map<String, Value>,
) -> Artifact {
    if !format.is_structured() {
        return Artifact::Text(raw.to_string());
    }
    match parse_structured(raw, format) {
        Some(mut value) => {
            enrich(&mut value, defaults);
            Artifact::Structured(value)
        }
        None => {
            tracing::debug!(format = %format, "Structured parse failed, keeping raw text");
            Artifact::Text(raw.to_string())
        }
    }
}

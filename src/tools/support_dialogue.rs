//! Multi-turn customer support conversations.

use super::pick;
use crate::error::ValidationError;
use crate::tool::schema::{self, SchemaField};
use crate::tool::{choose_enum, clamp_i64, ArgKind, ArgSpec, GeneratorTool, ToolArgs};
use crate::types::OutputFormat;
use serde_json::{json, Map, Value};

const DOMAINS: &[&str] = &["telecom", "banking", "retail", "software", "travel"];
const TONES: &[&str] = &["neutral", "frustrated", "confused", "polite"];

const ISSUES: &[&str] = &[
    "a billing discrepancy",
    "a failed login",
    "a delayed delivery",
    "an unexpected service outage",
    "a cancellation request",
    "a feature question",
];

const RESOLUTIONS: &[&str] = &["resolved", "escalated", "unresolved"];

const FIELDS: &[SchemaField<'static>] = &[
    ("conversation_id", "the identifier given above"),
    ("domain", "business domain"),
    ("issue", "one-line issue summary"),
    ("turns", "list of {speaker, text} objects alternating customer and agent"),
    ("resolution", "resolved, escalated or unresolved"),
];

pub struct SupportDialogueTool {
    domain: String,
    tone: String,
    turns: i64,
}

impl SupportDialogueTool {
    pub const NAME: &'static str = "support_dialogue";

    pub fn new() -> Self {
        Self {
            domain: "retail".to_string(),
            tone: "neutral".to_string(),
            turns: 6,
        }
    }
}

impl Default for SupportDialogueTool {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorTool for SupportDialogueTool {
    fn scenario_name(&self) -> &str {
        Self::NAME
    }

    fn artifact_prefix(&self) -> &str {
        "dialogue"
    }

    fn description(&self) -> &str {
        "Customer support conversations between a customer and an agent"
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "synthgen generate support_dialogue --count 20 -- --domain banking --turns 8"
                .to_string(),
            "synthgen generate support_dialogue --format markdown -- --tone frustrated".to_string(),
        ]
    }

    fn cli_arguments(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::new("domain", ArgKind::String, "Business domain")
                .with_default("retail")
                .with_choices(DOMAINS),
            ArgSpec::new("tone", ArgKind::String, "Customer tone")
                .with_default("neutral")
                .with_choices(TONES),
            ArgSpec::new("turns", ArgKind::Integer, "Number of turns (2-20)").with_default(6),
        ]
    }

    fn validate_args(&mut self, args: &ToolArgs) -> Result<(), ValidationError> {
        self.domain = choose_enum(args, "domain", DOMAINS, "retail")?;
        self.tone = choose_enum(args, "tone", TONES, "neutral")?;
        self.turns = clamp_i64(args, "turns", 2, 20, 6)?;
        Ok(())
    }

    fn build_prompt(&self, output_format: &OutputFormat, unique_id: &str) -> String {
        format!(
            "Write a realistic customer support conversation.\n\
             Conversation ID: {unique_id}\n\
             Generated at: {timestamp}\n\
             Domain: {domain}\n\
             Customer issue: {issue}\n\
             Customer tone: {tone}\n\
             Number of turns: {turns}\n\
             Expected outcome: {resolution}\n\n\
             {instruction}\n{skeleton}\n",
            timestamp = schema::timestamp(),
            domain = self.domain,
            issue = pick(ISSUES),
            tone = self.tone,
            turns = self.turns,
            resolution = pick(RESOLUTIONS),
            instruction = schema::format_instruction(output_format),
            skeleton = schema::skeleton(output_format, FIELDS),
        )
    }

    fn enrichment_defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert("domain".into(), json!(self.domain));
        defaults.insert("tone".into(), json!(self.tone));
        defaults
    }
}

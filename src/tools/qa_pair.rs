//! Question/answer pairs on a caller-chosen topic.

use super::pick;
use crate::error::ValidationError;
use crate::tool::schema::{self, SchemaField};
use crate::tool::{choose_enum, ArgKind, ArgSpec, GeneratorTool, ToolArgs};
use crate::types::OutputFormat;
use serde_json::{json, Map, Value};

const DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];

const QUESTION_STYLES: &[&str] = &[
    "definition",
    "comparison",
    "worked example",
    "common misconception",
    "step-by-step procedure",
];

const FIELDS: &[SchemaField<'static>] = &[
    ("qa_id", "the identifier given above"),
    ("topic", "topic of the question"),
    ("difficulty", "easy, medium or hard"),
    ("question", "the question"),
    ("answer", "a correct, self-contained answer"),
    ("explanation", "why the answer is correct"),
];

pub struct QaPairTool {
    topic: String,
    difficulty: String,
}

impl QaPairTool {
    pub const NAME: &'static str = "qa_pair";

    pub fn new() -> Self {
        Self {
            topic: "general science".to_string(),
            difficulty: "medium".to_string(),
        }
    }
}

impl Default for QaPairTool {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorTool for QaPairTool {
    fn scenario_name(&self) -> &str {
        Self::NAME
    }

    fn artifact_prefix(&self) -> &str {
        "qa"
    }

    fn description(&self) -> &str {
        "Question and answer pairs with explanations"
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "synthgen generate qa_pair --count 100 -- --topic \"rust ownership\" --difficulty hard"
                .to_string(),
        ]
    }

    fn cli_arguments(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::new("topic", ArgKind::String, "Subject area for the questions")
                .with_default("general science"),
            ArgSpec::new("difficulty", ArgKind::String, "Question difficulty")
                .with_default("medium")
                .with_choices(DIFFICULTIES),
        ]
    }

    fn validate_args(&mut self, args: &ToolArgs) -> Result<(), ValidationError> {
        if let Some(topic) = args.get_str("topic") {
            let topic = topic.trim();
            if topic.is_empty() {
                return Err(ValidationError::new("topic", "must not be empty"));
            }
            self.topic = topic.to_string();
        }
        self.difficulty = choose_enum(args, "difficulty", DIFFICULTIES, "medium")?;
        Ok(())
    }

    fn build_prompt(&self, output_format: &OutputFormat, unique_id: &str) -> String {
        format!(
            "Write one question and answer pair.\n\
             QA ID: {unique_id}\n\
             Generated at: {timestamp}\n\
             Topic: {topic}\n\
             Difficulty: {difficulty}\n\
             Question style: {style}\n\n\
             {instruction}\n{skeleton}\n",
            timestamp = schema::timestamp(),
            topic = self.topic,
            difficulty = self.difficulty,
            style = pick(QUESTION_STYLES),
            instruction = schema::format_instruction(output_format),
            skeleton = schema::skeleton(output_format, FIELDS),
        )
    }

    fn enrichment_defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert("topic".into(), json!(self.topic));
        defaults.insert("difficulty".into(), json!(self.difficulty));
        defaults
    }

    /// Identifiers carry the difficulty so files sort by level in a listing
    fn unique_id(&self) -> String {
        format!("{}-{}", self.difficulty, uuid::Uuid::new_v4().simple())
    }
}

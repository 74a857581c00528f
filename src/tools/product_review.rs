//! Product review records with a controllable rating spread and sentiment mix.

use super::pick;
use crate::error::ValidationError;
use crate::tool::schema::{self, SchemaField};
use crate::tool::{choose_enum, clamp_i64, ArgKind, ArgSpec, GeneratorTool, ToolArgs};
use crate::types::OutputFormat;
use rand::Rng;
use serde_json::{json, Map, Value};

const CATEGORIES: &[&str] = &["electronics", "books", "home", "apparel", "grocery"];

const PERSONAS: &[&str] = &[
    "first-time buyer",
    "long-time customer",
    "professional reviewer",
    "gift purchaser",
    "bargain hunter",
];

const FIELDS: &[SchemaField<'static>] = &[
    ("review_id", "the identifier given above"),
    ("product_name", "plausible product name"),
    ("category", "product category"),
    ("rating", "integer star rating"),
    ("title", "short review headline"),
    ("body", "review text, 2-5 sentences"),
    ("sentiment", "positive or negative"),
];

pub struct ProductReviewTool {
    category: String,
    rating_min: i64,
    rating_max: i64,
    positive_pct: i64,
}

impl ProductReviewTool {
    pub const NAME: &'static str = "product_review";

    pub fn new() -> Self {
        Self {
            category: "electronics".to_string(),
            rating_min: 1,
            rating_max: 5,
            positive_pct: 70,
        }
    }
}

impl Default for ProductReviewTool {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorTool for ProductReviewTool {
    fn scenario_name(&self) -> &str {
        Self::NAME
    }

    fn artifact_prefix(&self) -> &str {
        "review"
    }

    fn description(&self) -> &str {
        "Customer product reviews with star ratings and sentiment labels"
    }

    fn examples(&self) -> Vec<String> {
        vec![
            "synthgen generate product_review --count 50 -- --category books".to_string(),
            "synthgen generate product_review --format yaml -- --positive_pct 20 --rating_max 3"
                .to_string(),
        ]
    }

    fn cli_arguments(&self) -> Vec<ArgSpec> {
        vec![
            ArgSpec::new("category", ArgKind::String, "Product category")
                .with_default("electronics")
                .with_choices(CATEGORIES),
            ArgSpec::new("rating_min", ArgKind::Integer, "Lowest star rating (1-5)")
                .with_default(1),
            ArgSpec::new("rating_max", ArgKind::Integer, "Highest star rating (1-5)")
                .with_default(5),
            ArgSpec::new(
                "positive_pct",
                ArgKind::Integer,
                "Share of positive reviews in percent (0-100)",
            )
            .with_default(70),
        ]
    }

    fn validate_args(&mut self, args: &ToolArgs) -> Result<(), ValidationError> {
        self.category = choose_enum(args, "category", CATEGORIES, "electronics")?;
        let low = clamp_i64(args, "rating_min", 1, 5, 1)?;
        let high = clamp_i64(args, "rating_max", 1, 5, 5)?;
        (self.rating_min, self.rating_max) = if low <= high { (low, high) } else { (high, low) };
        self.positive_pct = clamp_i64(args, "positive_pct", 0, 100, 70)?;
        Ok(())
    }

    fn build_prompt(&self, output_format: &OutputFormat, unique_id: &str) -> String {
        let mut rng = rand::thread_rng();
        let rating = rng.gen_range(self.rating_min..=self.rating_max);
        let sentiment = if rng.gen_range(0..100) < self.positive_pct {
            "positive"
        } else {
            "negative"
        };
        let persona = pick(PERSONAS);

        format!(
            "Write one realistic customer review.\n\
             Review ID: {unique_id}\n\
             Generated at: {timestamp}\n\
             Category: {category}\n\
             Star rating: {rating}\n\
             Sentiment: {sentiment}\n\
             Reviewer: {persona}\n\n\
             {instruction}\n{skeleton}\n",
            timestamp = schema::timestamp(),
            category = self.category,
            instruction = schema::format_instruction(output_format),
            skeleton = schema::skeleton(output_format, FIELDS),
        )
    }

    fn enrichment_defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        defaults.insert("category".into(), json!(self.category));
        defaults.insert("language".into(), json!("en"));
        defaults.insert("verified_purchase".into(), json!(true));
        defaults
    }
}

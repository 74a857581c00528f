//! Built-in tools driven end to end through the orchestrator

use crate::integration::test_utils::{artifacts_with_prefix, read_json};
use async_trait::async_trait;
use std::sync::Arc;
use synthgen::backend::EchoBackend;
use synthgen::{
    BackendError, GenerationOptions, GeneratorTool, Orchestrator, OutputFormat, RunRequest,
    TextBackend, ToolArgs, ToolRegistry,
};
use tempfile::TempDir;

/// Always answers with the same text
struct CannedBackend(&'static str);

#[async_trait]
impl TextBackend for CannedBackend {
    async fn generate(
        &self,
        _prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, BackendError> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "canned"
    }
}

fn configured(name: &str, args: ToolArgs) -> Arc<dyn GeneratorTool> {
    let registry = ToolRegistry::with_builtin_tools().unwrap();
    let mut tool = registry.from_name(name).unwrap();
    tool.validate_args(&args).unwrap();
    Arc::from(tool)
}

#[tokio::test]
async fn test_fenced_json_is_parsed_and_enriched() {
    let dir = TempDir::new().unwrap();
    let tool = configured("product_review", ToolArgs::new().with("category", "books"));
    let backend = Arc::new(CannedBackend(
        "```json\n{\"title\": \"Gripping\", \"rating\": 5, \"language\": \"de\"}\n```",
    ));

    let summary = Orchestrator::new(tool, backend)
        .run(&RunRequest::new(2, dir.path()))
        .await
        .unwrap();
    assert_eq!(summary.succeeded(), 2);

    for path in artifacts_with_prefix(dir.path(), "review") {
        let record = read_json(&path);
        assert_eq!(record["title"], "Gripping");
        assert_eq!(record["category"], "books");
        assert_eq!(record["language"], "de", "existing fields are never overwritten");
        assert_eq!(record["verified_purchase"], true);
    }
}

#[tokio::test]
async fn test_unparseable_json_is_persisted_verbatim() {
    let dir = TempDir::new().unwrap();
    let tool = configured("qa_pair", ToolArgs::new());
    let raw = "Q: why is the sky blue?\nA: Rayleigh scattering.";

    let summary = Orchestrator::new(tool, Arc::new(CannedBackend(raw)))
        .run(&RunRequest::new(1, dir.path()))
        .await
        .unwrap();
    assert_eq!(summary.succeeded(), 1);

    let files = artifacts_with_prefix(dir.path(), "qa");
    assert_eq!(files.len(), 1);
    assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), raw);
}

#[tokio::test]
async fn test_every_builtin_tool_writes_text_records() {
    let registry = ToolRegistry::with_builtin_tools().unwrap();
    for name in registry.names() {
        let dir = TempDir::new().unwrap();
        let tool = configured(name, ToolArgs::new());
        let prefix = tool.artifact_prefix().to_string();

        let summary = Orchestrator::new(tool, Arc::new(EchoBackend))
            .run(&RunRequest::new(2, dir.path()).with_format(OutputFormat::Text))
            .await
            .unwrap();
        assert_eq!(summary.succeeded(), 2, "tool {}", name);

        let files = artifacts_with_prefix(dir.path(), &prefix);
        assert_eq!(files.len(), 2, "tool {}", name);
        for path in files {
            assert_eq!(path.extension().unwrap(), "txt");
            let id = path
                .file_stem()
                .unwrap()
                .to_str()
                .unwrap()
                .strip_prefix(&format!("{}_", prefix))
                .unwrap()
                .to_string();
            let body = std::fs::read_to_string(&path).unwrap();
            assert!(body.contains(&id), "prompt for {} should name its record id", name);
        }
    }
}

//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::backend::{BackendFactory, EchoBackend, TextBackend};
use crate::config::{ConfigLoader, SynthConfig};
use crate::error::ApiError;
use crate::orchestrator::{Orchestrator, RunRequest};
use crate::registry::ToolRegistry;
use crate::tool::GeneratorTool;
use crate::types::OutputFormat;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::cli::command_name;
use crate::cli::parse::{Commands, GenerateArgs, ToolsCommands};
use crate::cli::presentation::{
    format_run_summary_json, format_run_summary_text, format_tool_list_json,
    format_tool_list_text, format_tool_show_json, format_tool_show_text,
};
use crate::cli::tool_args::parse_tool_args;

/// Exit status when a run finished but some tasks failed
pub const EXIT_TASK_FAILURES: i32 = 2;

/// Printable command result and the process exit status it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self { text, exit_code: 0 }
    }
}

/// Runtime context for CLI execution: loaded configuration and the tool registry.
pub struct RunContext {
    config: SynthConfig,
    registry: ToolRegistry,
}

impl RunContext {
    /// Create run context from an optional config path. Uses ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Self::with_config(config)
    }

    /// Context over an already loaded configuration with the built-in tools registered
    pub fn with_config(config: SynthConfig) -> Result<Self, ApiError> {
        let registry = ToolRegistry::with_builtin_tools()?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a command and return its output.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let name = command_name(command);
        let started = Instant::now();
        debug!(command = %name, "Executing command");

        let result = match command {
            Commands::Tools { command } => self.handle_tools(command).map(CommandOutput::ok),
            Commands::Generate(args) => self.handle_generate(args),
        };

        debug!(
            command = %name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_tools(&self, command: &ToolsCommands) -> Result<String, ApiError> {
        match command {
            ToolsCommands::List { format } => {
                let tools = self
                    .registry
                    .names()
                    .into_iter()
                    .map(|name| self.registry.from_name(name))
                    .collect::<Result<Vec<_>, _>>()?;
                match format.as_str() {
                    "json" => format_tool_list_json(&tools),
                    _ => Ok(format_tool_list_text(&tools)),
                }
            }
            ToolsCommands::Show { name, format } => {
                let tool = self.registry.from_name(name)?;
                match format.as_str() {
                    "json" => format_tool_show_json(tool.as_ref()),
                    _ => Ok(format_tool_show_text(tool.as_ref())),
                }
            }
        }
    }

    fn handle_generate(&self, args: &GenerateArgs) -> Result<CommandOutput, ApiError> {
        let mut tool = self.registry.from_name(&args.tool)?;
        let tool_args = parse_tool_args(&args.tool, &tool.cli_arguments(), &args.tool_args)?;
        tool.validate_args(&tool_args)?;
        let tool: Arc<dyn GeneratorTool> = Arc::from(tool);

        let request = self.build_request(args);
        let backend: Arc<dyn TextBackend> = if args.dry_run {
            Arc::new(EchoBackend)
        } else {
            Arc::from(BackendFactory::create(&self.config.backend)?)
        };
        info!(
            tool = %args.tool,
            backend = backend.name(),
            count = request.count,
            concurrency = request.concurrency,
            format = %request.output_format,
            out_dir = %request.out_dir.display(),
            "Starting generation run"
        );

        let orchestrator = Orchestrator::new(tool, backend)
            .with_options(self.config.generation.generation_options());
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::Runtime(format!("Failed to start async runtime: {}", e)))?;
        let summary = runtime.block_on(orchestrator.run(&request))?;

        let text = match args.output.as_str() {
            "json" => format_run_summary_json(&args.tool, &summary)?,
            _ => format_run_summary_text(&args.tool, &summary),
        };
        let exit_code = if summary.is_success() || args.allow_failures {
            0
        } else {
            EXIT_TASK_FAILURES
        };
        Ok(CommandOutput { text, exit_code })
    }

    /// Config defaults with any run flags layered on top
    fn build_request(&self, args: &GenerateArgs) -> RunRequest {
        let generation = &self.config.generation;
        let mut request = generation.run_request(args.count);

        if let Some(concurrency) = args.concurrency {
            request = request.with_concurrency(concurrency);
        }
        if let Some(secs) = args.timeout {
            request = request.with_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }
        if let Some(ref format) = args.format {
            let format = format
                .parse::<OutputFormat>()
                .unwrap_or_else(|never| match never {});
            request = request.with_format(format);
        }
        if let Some(ref out_dir) = args.out_dir {
            request.out_dir = out_dir.clone();
        }
        if let Some(max_retries) = args.max_retries {
            let mut retry = generation.retry_policy();
            retry.max_retries = max_retries;
            request = request.with_retry(retry);
        }
        request
    }
}

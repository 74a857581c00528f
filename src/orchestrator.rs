//! Generation orchestrator: drives `count` independent generation tasks for one tool.
//!
//! Each task runs prompt -> backend -> post-process -> persist while holding one slot
//! of a counting semaphore, so at most `concurrency` tasks are mid-pipeline at once.
//! Failures and timeouts are folded into the [`RunSummary`]; they never cancel siblings.

pub mod summary;

pub use summary::{Outcome, RunSummary, TaskReport};

use crate::backend::TextBackend;
use crate::error::{BackendError, ValidationError};
use crate::persistence::ArtifactWriter;
use crate::tool::GeneratorTool;
use crate::types::{Artifact, GenerationOptions, OutputFormat};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Bounded retry with exponential backoff for transient backend failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    const MAX_DELAY: Duration = Duration::from_secs(60);

    /// No automatic retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(1000),
        }
    }

    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.min(16));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(Self::MAX_DELAY)
            .min(Self::MAX_DELAY)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Parameters of one run
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub count: usize,
    pub out_dir: PathBuf,
    pub output_format: OutputFormat,
    pub concurrency: usize,
    /// Per-task bound on each backend call; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl RunRequest {
    pub const DEFAULT_CONCURRENCY: usize = 8;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(count: usize, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            count,
            out_dir: out_dir.into(),
            output_format: OutputFormat::Json,
            concurrency: Self::DEFAULT_CONCURRENCY,
            timeout: Some(Self::DEFAULT_TIMEOUT),
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.concurrency == 0 {
            return Err(ValidationError::new("concurrency", "must be at least 1"));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ValidationError::new(
                "timeout",
                "must be positive (omit it to disable the timeout)",
            ));
        }
        Ok(())
    }
}

/// Why a backend stage did not produce text
enum BackendStageError {
    TimedOut,
    Failed(BackendError),
}

/// Drives generation runs for one validated tool
pub struct Orchestrator {
    tool: Arc<dyn GeneratorTool>,
    backend: Arc<dyn TextBackend>,
    options: GenerationOptions,
    writer: ArtifactWriter,
}

impl Orchestrator {
    pub fn new(tool: Arc<dyn GeneratorTool>, backend: Arc<dyn TextBackend>) -> Self {
        Self {
            tool,
            backend,
            options: GenerationOptions::default(),
            writer: ArtifactWriter::new(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn tool(&self) -> &dyn GeneratorTool {
        self.tool.as_ref()
    }

    /// Run `request.count` tasks and wait for every one to reach a terminal state
    ///
    /// Only an invalid request is an error; per-task failures are data in the summary.
    pub async fn run(&self, request: &RunRequest) -> Result<RunSummary, ValidationError> {
        request.validate()?;
        let supported = self.tool.supported_output_formats();
        if !supported.contains(&request.output_format) {
            return Err(ValidationError {
                field: "format".to_string(),
                message: format!(
                    "'{}' is not supported by {}",
                    request.output_format,
                    self.tool.scenario_name()
                ),
                accepted: supported.iter().map(ToString::to_string).collect(),
            });
        }

        let started = Instant::now();
        let mut summary = RunSummary::new();
        if request.count == 0 {
            return Ok(summary.finish(started.elapsed()));
        }

        info!(
            tool = self.tool.scenario_name(),
            backend = self.backend.name(),
            count = request.count,
            concurrency = request.concurrency,
            format = %request.output_format,
            "Generation run started"
        );

        // Fresh semaphore per run: nothing carries over between runs
        let semaphore = Semaphore::new(request.concurrency);
        let mut tasks: FuturesUnordered<_> = (0..request.count)
            .map(|index| self.run_task(index, request, &semaphore))
            .collect();

        while let Some(report) = tasks.next().await {
            match &report.outcome {
                Outcome::Succeeded { artifact_path } => debug!(
                    index = report.index,
                    unique_id = %report.unique_id,
                    path = %artifact_path.display(),
                    "Task succeeded"
                ),
                outcome => warn!(
                    index = report.index,
                    unique_id = %report.unique_id,
                    outcome = outcome.label(),
                    error = ?outcome,
                    "Task failed"
                ),
            }
            summary.record(report);
        }

        let summary = summary.finish(started.elapsed());
        info!(
            tool = self.tool.scenario_name(),
            attempted = summary.attempted(),
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            elapsed_ms = summary.elapsed().as_millis() as u64,
            "Generation run finished"
        );
        Ok(summary)
    }

    async fn run_task(
        &self,
        index: usize,
        request: &RunRequest,
        semaphore: &Semaphore,
    ) -> TaskReport {
        let started = Instant::now();

        // The permit is held until this function returns, covering the whole pipeline
        let _permit = match semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                return TaskReport {
                    index,
                    unique_id: String::new(),
                    outcome: Outcome::BackendFailed {
                        cause: "admission semaphore closed".to_string(),
                    },
                    attempts: 0,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                }
            }
        };

        let unique_id = self.tool.unique_id();
        let prompt = self.tool.build_prompt(&request.output_format, &unique_id);
        let (raw, attempts) = self.call_backend(&prompt, request).await;

        let outcome = match raw {
            Err(BackendStageError::TimedOut) => Outcome::TimedOut,
            Err(BackendStageError::Failed(err)) => Outcome::BackendFailed {
                cause: err.to_string(),
            },
            Ok(raw) => {
                let artifact = self.tool.post_process(&raw, &request.output_format);
                self.persist(artifact, &unique_id, request).await
            }
        };

        TaskReport {
            index,
            unique_id,
            outcome,
            attempts,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Call the backend under the per-task timeout, retrying transient failures
    ///
    /// The timeout bounds the whole stage, backoff sleeps included, so a task never
    /// holds its slot past the limit however many retries it is allowed.
    async fn call_backend(
        &self,
        prompt: &str,
        request: &RunRequest,
    ) -> (Result<String, BackendStageError>, u32) {
        let attempts = AtomicU32::new(0);
        let stage = self.attempt_with_retries(prompt, &request.retry, &attempts);
        let result = match request.timeout {
            // Dropping the stage future on timeout abandons the in-flight request
            Some(limit) => match tokio::time::timeout(limit, stage).await {
                Ok(result) => result.map_err(BackendStageError::Failed),
                Err(_) => Err(BackendStageError::TimedOut),
            },
            None => stage.await.map_err(BackendStageError::Failed),
        };
        (result, attempts.load(Ordering::Relaxed))
    }

    async fn attempt_with_retries(
        &self,
        prompt: &str,
        retry: &RetryPolicy,
        attempts: &AtomicU32,
    ) -> Result<String, BackendError> {
        loop {
            let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
            match self.backend.generate(prompt, &self.options).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt <= retry.max_retries => {
                    let delay = retry.delay_for(attempt - 1);
                    debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying backend call"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Write the artifact on the blocking pool so file I/O never stalls task scheduling
    async fn persist(
        &self,
        artifact: Artifact,
        unique_id: &str,
        request: &RunRequest,
    ) -> Outcome {
        let writer = self.writer;
        let out_dir = request.out_dir.clone();
        let prefix = self.tool.artifact_prefix().to_string();
        let identifier = unique_id.to_string();
        let format = request.output_format.clone();

        let written = tokio::task::spawn_blocking(move || {
            writer.write(&artifact, &out_dir, &prefix, &identifier, &format)
        })
        .await;

        match written {
            Ok(Ok(artifact_path)) => Outcome::Succeeded { artifact_path },
            Ok(Err(err)) => Outcome::PersistFailed {
                cause: err.to_string(),
            },
            Err(join_err) => Outcome::PersistFailed {
                cause: crate::error::PersistError::Aborted(join_err.to_string()).to_string(),
            },
        }
    }
}

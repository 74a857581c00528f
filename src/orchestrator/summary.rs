//! Per-task outcomes and the aggregate run summary.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Terminal state of one generation task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded { artifact_path: PathBuf },
    TimedOut,
    BackendFailed { cause: String },
    PersistFailed { cause: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    /// Short label for logs and tables
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Succeeded { .. } => "succeeded",
            Outcome::TimedOut => "timed_out",
            Outcome::BackendFailed { .. } => "backend_failed",
            Outcome::PersistFailed { .. } => "persist_failed",
        }
    }
}

/// Everything known about one finished task
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub index: usize,
    pub unique_id: String,
    pub outcome: Outcome,
    /// Backend attempts made, including retries
    pub attempts: u32,
    pub elapsed_ms: u64,
}

/// Aggregate counts for one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    attempted: usize,
    succeeded: usize,
    failed: usize,
    artifacts: Vec<PathBuf>,
    failures: Vec<TaskReport>,
    elapsed_ms: u64,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished task into the summary
    pub fn record(&mut self, report: TaskReport) {
        self.attempted += 1;
        match &report.outcome {
            Outcome::Succeeded { artifact_path } => {
                self.succeeded += 1;
                self.artifacts.push(artifact_path.clone());
            }
            _ => {
                self.failed += 1;
                self.failures.push(report);
            }
        }
    }

    pub(crate) fn finish(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = elapsed.as_millis() as u64;
        self.failures.sort_by_key(|report| report.index);
        self
    }

    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Failed tasks ordered by task index
    pub fn failures(&self) -> &[TaskReport] {
        &self.failures
    }

    /// Written artifacts in completion order
    pub fn artifact_paths(&self) -> impl Iterator<Item = &Path> {
        self.artifacts.iter().map(PathBuf::as_path)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

//! Synthgen: Concurrent Synthetic-Record Generation
//!
//! A registry of pluggable generator tools, each describing how to prompt a text
//! generation backend and how to interpret its output, driven by one orchestrator that
//! issues many independent generation tasks under a concurrency cap and persists every
//! successful result as a file.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod persistence;
pub mod registry;
pub mod tool;
pub mod tools;
pub mod types;

pub use backend::{BackendConfig, BackendFactory, TextBackend};
pub use error::{ApiError, BackendError, PersistError, RegistryError, ValidationError};
pub use orchestrator::{Orchestrator, Outcome, RetryPolicy, RunRequest, RunSummary, TaskReport};
pub use persistence::ArtifactWriter;
pub use registry::{register_builtin_tools, ToolConstructor, ToolRegistry};
pub use tool::{ArgKind, ArgSpec, GeneratorTool, ToolArgs};
pub use types::{Artifact, GenerationOptions, OutputFormat};

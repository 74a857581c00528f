//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, RegistryError};

/// Map domain/service errors to a string for CLI output, with a hint where one helps.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Registry(RegistryError::UnknownTool(_)) => {
            format!("{}\nRun `synthgen tools list` to see registered tools.", e)
        }
        ApiError::Backend(err) if err.is_retryable() => {
            format!("{}\nThe backend may be overloaded; try --max-retries.", e)
        }
        _ => e.to_string(),
    }
}

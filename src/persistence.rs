//! Artifact persistence
//!
//! One file per successful task at `<out_dir>/<prefix>_<id>.<ext>`. Writes go to a
//! uniquely named temporary file in the same directory and are renamed into place,
//! so readers never observe a half-written artifact. Two writers targeting the same
//! final name both succeed and the last rename wins.

use crate::error::PersistError;
use crate::types::{Artifact, OutputFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// Format-aware artifact writer
#[derive(Debug, Default, Clone, Copy)]
pub struct ArtifactWriter;

impl ArtifactWriter {
    pub fn new() -> Self {
        Self
    }

    /// Final path for an artifact
    pub fn artifact_path(
        out_dir: &Path,
        prefix: &str,
        identifier: &str,
        format: &OutputFormat,
    ) -> PathBuf {
        out_dir.join(format!("{}_{}.{}", prefix, identifier, format.extension()))
    }

    /// Render an artifact for `format`
    ///
    /// Structured values become pretty JSON or block YAML; strings are written as-is;
    /// everything else falls back to the artifact's display form.
    pub fn render(artifact: &Artifact, format: &OutputFormat) -> Result<String, PersistError> {
        match (artifact, format) {
            (Artifact::Text(text), _) => Ok(text.clone()),
            (Artifact::Structured(value), OutputFormat::Json) => {
                let mut rendered = serde_json::to_string_pretty(value)
                    .map_err(|e| PersistError::Serialize(e.to_string()))?;
                rendered.push('\n');
                Ok(rendered)
            }
            (Artifact::Structured(value), OutputFormat::Yaml) => {
                serde_yaml::to_string(value).map_err(|e| PersistError::Serialize(e.to_string()))
            }
            (Artifact::Structured(_), _) => Ok(artifact.to_string()),
        }
    }

    /// Write one artifact, creating `out_dir` if needed. Returns the final path.
    pub fn write(
        &self,
        artifact: &Artifact,
        out_dir: &Path,
        prefix: &str,
        identifier: &str,
        format: &OutputFormat,
    ) -> Result<PathBuf, PersistError> {
        let contents = Self::render(artifact, format)?;

        // create_dir_all tolerates concurrent first writers
        fs::create_dir_all(out_dir).map_err(|source| PersistError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let final_path = Self::artifact_path(out_dir, prefix, identifier, format);
        let temp_path = out_dir.join(format!(
            ".{}_{}.{}.tmp",
            prefix,
            identifier,
            uuid::Uuid::new_v4().simple()
        ));

        fs::write(&temp_path, contents.as_bytes()).map_err(|source| {
            // A partial write may have created the file
            let _ = fs::remove_file(&temp_path);
            PersistError::Io {
                path: temp_path.clone(),
                source,
            }
        })?;

        fs::rename(&temp_path, &final_path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            PersistError::Io {
                path: final_path.clone(),
                source,
            }
        })?;

        Ok(final_path)
    }
}

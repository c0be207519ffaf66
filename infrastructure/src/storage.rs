//! Local file artifact sink

use ror_application::{ArtifactSink, ArtifactSinkError};
use ror_domain::Artifact;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes artifacts into a directory under their own file names
#[derive(Debug, Clone)]
pub struct LocalArtifactSink {
    directory: PathBuf,
}

impl LocalArtifactSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Sink for the current working directory
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ArtifactSink for LocalArtifactSink {
    fn save(&self, artifact: &Artifact) -> Result<String, ArtifactSinkError> {
        let fail = |e: std::io::Error| ArtifactSinkError::WriteFailed {
            file_name: artifact.file_name.clone(),
            message: e.to_string(),
        };

        fs::create_dir_all(&self.directory).map_err(fail)?;
        let path = self.directory.join(&artifact.file_name);
        fs::write(&path, &artifact.contents).map_err(fail)?;

        debug!("Wrote {} bytes to {}", artifact.contents.len(), path.display());
        Ok(path.display().to_string())
    }
}

//! Artifact sink port
//!
//! The "trigger a file save" collaborator: receives a rendered export and
//! stores it somewhere the user can pick it up.

use ror_domain::Artifact;
use thiserror::Error;

/// Errors that can occur while saving an artifact
#[derive(Error, Debug)]
pub enum ArtifactSinkError {
    #[error("Failed to write {file_name}: {message}")]
    WriteFailed { file_name: String, message: String },
}

pub trait ArtifactSink: Send + Sync {
    /// Store the artifact, returning a human-readable location
    fn save(&self, artifact: &Artifact) -> Result<String, ArtifactSinkError>;
}

//! Harvest session
//!
//! Holds the working set between steps: the last extracted identifiers
//! and the records fetched for them. Each step checks its precondition
//! and reports a user-facing error instead of silently doing nothing.

use crate::ports::artifact_sink::{ArtifactSink, ArtifactSinkError};
use crate::ports::clipboard::{ClipboardError, ClipboardPort};
use crate::ports::progress::BatchProgressNotifier;
use crate::ports::registry_gateway::RegistryGateway;
use crate::use_cases::run_batch::{RunBatchError, RunBatchUseCase};
use ror_domain::{
    Artifact, BatchResult, BatchSummary, DomainError, ExportKind, ExportLayout, ExtractedSet,
    OrganisationRecord, extract, records_to_csv, records_to_json,
};
use thiserror::Error;
use tracing::{debug, info};

/// Built-in demonstration document
pub const SAMPLE_TEXT: &str = "# Sample ROR Data
https://ror.org/03vek6s52 - Harvard University
MIT: https://ror.org/042nb2s44
Stanford University (00f54p054)
https://ror.org/03v76x132 - Yale University
Princeton (00hx57361)
Columbia University - https://ror.org/00hj8s172

The study included researchers from various institutions including
Oxford University (https://ror.org/052gg0110) and Cambridge (https://ror.org/013meh722).

You can paste any text containing ROR URLs or IDs above.";

/// Errors surfaced by session operations
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Please paste some text containing ROR links or IDs.")]
    EmptyInput,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("No ROR IDs to fetch. Extract IDs first.")]
    NothingExtracted,

    #[error("{}", nothing_to_export_message(.0))]
    NothingToExport(ExportKind),

    #[error("Failed to copy to clipboard. Please try downloading instead.")]
    Clipboard(#[source] ClipboardError),

    #[error(transparent)]
    Save(#[from] ArtifactSinkError),

    #[error(transparent)]
    Batch(#[from] RunBatchError),
}

fn nothing_to_export_message(kind: &ExportKind) -> &'static str {
    match kind {
        ExportKind::Ids => "No IDs to download. Extract IDs first.",
        ExportKind::Json | ExportKind::Csv => {
            "No organisation data to download. Fetch details first."
        }
    }
}

/// Working state of one harvesting session
#[derive(Debug, Default)]
pub struct HarvestSession {
    extracted: Option<ExtractedSet>,
    result: Option<BatchResult>,
}

impl HarvestSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_text() -> &'static str {
        SAMPLE_TEXT
    }

    pub fn extracted(&self) -> Option<&ExtractedSet> {
        self.extracted.as_ref()
    }

    /// Records from the last fetch, empty until one completes
    pub fn records(&self) -> &[OrganisationRecord] {
        self.result
            .as_ref()
            .map(|r| r.records.as_slice())
            .unwrap_or(&[])
    }

    /// Summary of the last completed fetch
    pub fn summary(&self) -> Option<&BatchSummary> {
        self.result.as_ref().map(|r| &r.summary)
    }

    /// Replace the working set with the identifiers found in `text`
    ///
    /// Previously fetched records are dropped. On failure the session is
    /// left as it was.
    pub fn extract(&mut self, text: &str) -> Result<&ExtractedSet, HarvestError> {
        if text.trim().is_empty() {
            return Err(HarvestError::EmptyInput);
        }
        let set = extract(text)?;
        info!(
            "Extracted {} identifier(s) ({} matches)",
            set.unique_count(),
            set.total_found()
        );
        self.result = None;
        Ok(self.extracted.insert(set))
    }

    /// Resolve the current working set
    pub async fn fetch<G: RegistryGateway + 'static>(
        &mut self,
        use_case: &RunBatchUseCase<G>,
        progress: &dyn BatchProgressNotifier,
    ) -> Result<&BatchResult, HarvestError> {
        let ids = match &self.extracted {
            Some(set) if !set.is_empty() => set,
            _ => return Err(HarvestError::NothingExtracted),
        };

        let result = use_case.execute_with_progress(ids, progress).await?;
        debug!("Session now holds {} record(s)", result.records.len());
        Ok(self.result.insert(result))
    }

    /// Extract then fetch in one go
    pub async fn extract_and_fetch<G: RegistryGateway + 'static>(
        &mut self,
        text: &str,
        use_case: &RunBatchUseCase<G>,
        progress: &dyn BatchProgressNotifier,
    ) -> Result<&BatchResult, HarvestError> {
        self.extract(text)?;
        self.fetch(use_case, progress).await
    }

    /// Render the current state as a downloadable artifact
    pub fn export(&self, kind: ExportKind, layout: ExportLayout) -> Result<Artifact, HarvestError> {
        let contents = match kind {
            ExportKind::Ids => match &self.extracted {
                Some(set) if !set.is_empty() => set.to_text(),
                _ => return Err(HarvestError::NothingToExport(kind)),
            },
            ExportKind::Json | ExportKind::Csv if self.records().is_empty() => {
                return Err(HarvestError::NothingToExport(kind));
            }
            ExportKind::Json => records_to_json(self.records(), layout)?,
            ExportKind::Csv => records_to_csv(self.records(), layout)?,
        };
        Ok(Artifact::new(kind, contents))
    }

    /// Export and hand the artifact to `sink`, returning where it went
    pub fn save(
        &self,
        kind: ExportKind,
        layout: ExportLayout,
        sink: &dyn ArtifactSink,
    ) -> Result<String, HarvestError> {
        let artifact = self.export(kind, layout)?;
        let location = sink.save(&artifact)?;
        info!("Saved {} to {}", artifact.file_name, location);
        Ok(location)
    }

    /// Copy the newline-joined identifier list to the clipboard
    pub fn copy_ids(&self, clipboard: &dyn ClipboardPort) -> Result<usize, HarvestError> {
        let set = match &self.extracted {
            Some(set) if !set.is_empty() => set,
            _ => return Err(HarvestError::NothingToExport(ExportKind::Ids)),
        };
        clipboard
            .copy_text(&set.to_text())
            .map_err(HarvestError::Clipboard)?;
        Ok(set.len())
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.extracted = None;
        self.result = None;
    }
}

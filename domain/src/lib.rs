//! Domain layer for ror-harvest
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Identifiers
//!
//! A ROR ID is a nine-character lowercase alphanumeric code. [`extract`]
//! finds them in free text, either inside `https://ror.org/<id>` URLs or as
//! bare tokens, and returns an [`ExtractedSet`].
//!
//! ## Organisation records
//!
//! Each identifier resolves to an [`OrganisationRecord`]. Failed lookups
//! still yield a record (a placeholder carrying a [`FailureReason`]) so the
//! record list always lines up with the identifier list.
//!
//! ## Exports
//!
//! [`export`] renders identifiers and records as text, JSON or CSV.

pub mod config;
pub mod core;
pub mod export;
pub mod identifier;
pub mod organisation;

// Re-export commonly used types
pub use config::OutputFormat;
pub use crate::core::error::DomainError;
pub use export::{Artifact, ExportKind, ExportLayout, records_to_csv, records_to_json};
pub use identifier::{
    extractor::{ExtractedSet, extract},
    ror_id::RorId,
};
pub use organisation::{
    batch::{BatchResult, BatchSummary},
    outcome::FetchOutcome,
    record::{FailureReason, NOT_AVAILABLE, OrganisationRecord, or_unavailable},
};

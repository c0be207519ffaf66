//! Application layer for ror-harvest
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::FetchPolicy;
pub use ports::{
    artifact_sink::{ArtifactSink, ArtifactSinkError},
    clipboard::{ClipboardError, ClipboardPort},
    progress::{Backoff, BackoffReason, BatchProgressNotifier, NoProgress},
    registry_gateway::RegistryGateway,
    sleeper::{Sleeper, TokioSleeper},
};
pub use use_cases::harvest_session::{HarvestError, HarvestSession, SAMPLE_TEXT};
pub use use_cases::run_batch::{RunBatchError, RunBatchUseCase};

//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation
//! adapters must implement.

pub mod artifact_sink;
pub mod clipboard;
pub mod progress;
pub mod registry_gateway;
pub mod sleeper;

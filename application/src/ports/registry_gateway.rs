//! Registry gateway port
//!
//! Defines the interface for looking up one identifier in the ROR registry.

use async_trait::async_trait;
use ror_domain::{FetchOutcome, RorId};

/// Gateway for registry lookups
///
/// This port defines how the application layer talks to the registry.
/// Implementations (adapters) live in the infrastructure layer.
///
/// A call performs exactly one request and never retries on its own;
/// retry and backoff belong to the batch orchestrator. Failures are
/// reported as [`FetchOutcome`] variants rather than `Err`.
#[async_trait]
pub trait RegistryGateway: Send + Sync {
    /// Resolve a single identifier
    async fn resolve(&self, id: &RorId) -> FetchOutcome;
}

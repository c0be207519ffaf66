//! Progress notification port
//!
//! Defines the interface for reporting progress during a batch lookup.

use ror_domain::{BatchSummary, OrganisationRecord, RorId};
use std::fmt;
use std::time::Duration;

/// Why the orchestrator is waiting before another attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffReason {
    RateLimited,
    NetworkError,
}

impl fmt::Display for BackoffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackoffReason::RateLimited => write!(f, "Rate limit exceeded"),
            BackoffReason::NetworkError => write!(f, "Network error"),
        }
    }
}

/// Snapshot of a backoff wait, sent when it starts and on every tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    pub id: RorId,
    pub reason: BackoffReason,
    /// Attempt that just failed (1-based)
    pub attempt: u32,
    pub max_attempts: u32,
    /// Time left before the next attempt
    pub remaining: Duration,
}

/// Callback for progress updates during a batch lookup
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain lines, etc.)
pub trait BatchProgressNotifier: Send + Sync {
    /// Called once before the first lookup
    fn on_batch_start(&self, total: usize);

    /// Called before every request, including retries (`index` is 0-based)
    fn on_attempt(&self, index: usize, total: usize, id: &RorId, attempt: u32);

    /// Called when an identifier is finished, successfully or not
    fn on_item_complete(&self, index: usize, record: &OrganisationRecord);

    /// Called after the last identifier
    fn on_batch_complete(&self, summary: &BatchSummary);

    // ==================== Backoff Callbacks ====================

    /// Called when a backoff wait begins
    fn on_backoff_start(&self, _backoff: &Backoff) {}

    /// Called as the backoff countdown advances
    fn on_backoff_tick(&self, _backoff: &Backoff) {}

    /// Informational message (e.g. large batch warning)
    fn on_notice(&self, _message: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl BatchProgressNotifier for NoProgress {
    fn on_batch_start(&self, _total: usize) {}
    fn on_attempt(&self, _index: usize, _total: usize, _id: &RorId, _attempt: u32) {}
    fn on_item_complete(&self, _index: usize, _record: &OrganisationRecord) {}
    fn on_batch_complete(&self, _summary: &BatchSummary) {}
}

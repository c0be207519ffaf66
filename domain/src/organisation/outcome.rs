//! Result of a single registry lookup

use super::record::{FailureReason, OrganisationRecord};

/// What one registry call produced
///
/// The registry client reports these; the batch orchestrator decides
/// whether to retry and eventually turns every outcome into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 2xx with a parseable body
    Success(OrganisationRecord),
    /// Non-2xx other than 429; never retried
    HttpError { status: u16, message: String },
    /// No usable response (connect/timeout/body failure)
    NetworkError(String),
    /// HTTP 429
    RateLimited,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Whether the orchestrator may try this identifier again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchOutcome::NetworkError(_) | FetchOutcome::RateLimited
        )
    }

    /// The failure reason a placeholder would carry, if this is a failure
    pub fn failure_reason(&self) -> Option<FailureReason> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::HttpError { status, message } => Some(FailureReason::Upstream {
                status: *status,
                message: message.clone(),
            }),
            FetchOutcome::NetworkError(message) => Some(FailureReason::NetworkError {
                message: message.clone(),
            }),
            FetchOutcome::RateLimited => Some(FailureReason::RateLimitExceeded),
        }
    }
}

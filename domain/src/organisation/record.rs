//! Organisation record entity

use crate::core::string::strip_scheme;
use crate::identifier::ror_id::RorId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for any field the registry did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Use `value` if it is present and non-blank, otherwise [`NOT_AVAILABLE`]
pub fn or_unavailable<S: Into<String>>(value: Option<S>) -> String {
    value
        .map(Into::into)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Why a lookup ended in a placeholder record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Still rate limited after every allowed attempt
    RateLimitExceeded,
    /// Transport failure after every allowed attempt
    NetworkError { message: String },
    /// Non-2xx response other than 429
    Upstream { status: u16, message: String },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::RateLimitExceeded => {
                write!(f, "Rate limit exceeded - max retries reached")
            }
            FailureReason::NetworkError { .. } => write!(f, "Network error - max retries reached"),
            FailureReason::Upstream { status, message } => write!(f, "Error {}: {}", status, message),
        }
    }
}

/// Resolved registry data for one identifier (Entity)
///
/// Every textual field holds [`NOT_AVAILABLE`] rather than being empty.
/// Placeholder records carry the failure text in `name` and keep the
/// structured reason in `failure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationRecord {
    pub id: RorId,
    pub url: String,
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub city: String,
    /// Comma-joined organisation type labels
    #[serde(rename = "type")]
    pub org_type: String,
    pub status: String,
    pub established: String,
    pub website: String,
    #[serde(skip)]
    pub failure: Option<FailureReason>,
}

impl OrganisationRecord {
    /// A record with every field set to [`NOT_AVAILABLE`] except the ID and URL
    pub fn unavailable(id: RorId) -> Self {
        let na = || NOT_AVAILABLE.to_string();
        Self {
            url: id.url(),
            id,
            name: na(),
            country: na(),
            country_code: na(),
            city: na(),
            org_type: na(),
            status: na(),
            established: na(),
            website: na(),
            failure: None,
        }
    }

    /// A placeholder standing in for a lookup that ultimately failed
    pub fn placeholder(id: RorId, reason: FailureReason) -> Self {
        let mut record = Self::unavailable(id);
        record.name = reason.to_string();
        record.failure = Some(reason);
        record
    }

    pub fn is_placeholder(&self) -> bool {
        self.failure.is_some()
    }

    /// Status equals `active`, ignoring case
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }

    /// `Yes` / `No` rendering of [`Self::is_active`]
    pub fn active_label(&self) -> &'static str {
        if self.is_active() { "Yes" } else { "No" }
    }

    /// Website with any leading `http://` / `https://` removed
    pub fn website_without_scheme(&self) -> &str {
        if self.website == NOT_AVAILABLE {
            &self.website
        } else {
            strip_scheme(&self.website)
        }
    }

    /// Individual websites when several are stored comma-separated
    pub fn websites(&self) -> Vec<&str> {
        if self.website == NOT_AVAILABLE || self.website.trim().is_empty() {
            return Vec::new();
        }
        self.website
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

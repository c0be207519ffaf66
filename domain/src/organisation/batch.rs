//! Aggregate result of a batch lookup

use super::record::OrganisationRecord;
use serde::{Deserialize, Serialize};

/// Succeeded / failed counts for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[OrganisationRecord]) -> Self {
        let failed = records.iter().filter(|r| r.is_placeholder()).count();
        Self {
            total: records.len(),
            succeeded: records.len() - failed,
            failed,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Records in identifier order plus their summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub records: Vec<OrganisationRecord>,
    pub summary: BatchSummary,
}

impl BatchResult {
    pub fn new(records: Vec<OrganisationRecord>) -> Self {
        let summary = BatchSummary::from_records(&records);
        Self { records, summary }
    }

    /// Iterate over records that resolved successfully
    pub fn successful_records(&self) -> impl Iterator<Item = &OrganisationRecord> {
        self.records.iter().filter(|r| !r.is_placeholder())
    }

    /// Iterate over placeholder records
    pub fn failed_records(&self) -> impl Iterator<Item = &OrganisationRecord> {
        self.records.iter().filter(|r| r.is_placeholder())
    }
}

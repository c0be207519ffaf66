//! Output format value object

use serde::{Deserialize, Serialize};

/// How results are written to stdout
///
/// This is a domain concept representing how the output should be formatted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Identifier list plus organisation table (default)
    #[default]
    Table,
    /// Identifiers only, one per line
    Ids,
    /// JSON record export
    Json,
    /// CSV record export
    Csv,
}

impl OutputFormat {
    /// Whether this format needs registry lookups
    pub fn needs_records(&self) -> bool {
        !matches!(self, OutputFormat::Ids)
    }
}

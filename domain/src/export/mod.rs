//! Export rendering
//!
//! Pure functions that turn the working set into downloadable artifacts:
//!
//! | Kind | File | Content |
//! |------|------|---------|
//! | [`ExportKind::Ids`] | `ror-ids.txt` | one identifier per line |
//! | [`ExportKind::Json`] | `ror-organisations.json` | pretty-printed record array |
//! | [`ExportKind::Csv`] | `ror-organisations.csv` | header + one row per record |
//!
//! Websites lose their `http(s)://` prefix in the JSON and CSV forms.

mod csv_format;
mod json_format;

pub use csv_format::{BASIC_CSV_HEADER, EXTENDED_CSV_HEADER, records_to_csv};
pub use json_format::records_to_json;

use serde::{Deserialize, Serialize};

/// Which export to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Ids,
    Json,
    Csv,
}

impl ExportKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportKind::Ids => "ror-ids.txt",
            ExportKind::Json => "ror-organisations.json",
            ExportKind::Csv => "ror-organisations.csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportKind::Ids => "text/plain",
            ExportKind::Json => "application/json",
            ExportKind::Csv => "text/csv",
        }
    }
}

/// Column set for record exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportLayout {
    /// Name, website, location, country, active
    #[default]
    Basic,
    /// Basic columns plus id, url, type, status (and more in JSON)
    Extended,
}

/// A rendered export ready to hand to a file-save collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(kind: ExportKind, contents: impl Into<String>) -> Self {
        Self {
            file_name: kind.file_name().to_string(),
            content_type: kind.content_type().to_string(),
            contents: contents.into(),
        }
    }
}

//! JSON export

use super::ExportLayout;
use crate::core::error::DomainError;
use crate::organisation::record::OrganisationRecord;
use serde::Serialize;

#[derive(Serialize)]
struct BasicRow<'a> {
    name: &'a str,
    website: &'a str,
    location: &'a str,
    country: &'a str,
    active: &'a str,
}

#[derive(Serialize)]
struct ExtendedRow<'a> {
    id: &'a str,
    url: &'a str,
    name: &'a str,
    website: &'a str,
    location: &'a str,
    country: &'a str,
    country_code: &'a str,
    #[serde(rename = "type")]
    org_type: &'a str,
    status: &'a str,
    established: &'a str,
    active: &'a str,
}

/// Render records as a pretty-printed JSON array (two-space indent)
pub fn records_to_json(
    records: &[OrganisationRecord],
    layout: ExportLayout,
) -> Result<String, DomainError> {
    let rendered = match layout {
        ExportLayout::Basic => {
            let rows: Vec<BasicRow<'_>> = records
                .iter()
                .map(|r| BasicRow {
                    name: &r.name,
                    website: r.website_without_scheme(),
                    location: &r.city,
                    country: &r.country,
                    active: r.active_label(),
                })
                .collect();
            serde_json::to_string_pretty(&rows)
        }
        ExportLayout::Extended => {
            let rows: Vec<ExtendedRow<'_>> = records
                .iter()
                .map(|r| ExtendedRow {
                    id: r.id.as_str(),
                    url: &r.url,
                    name: &r.name,
                    website: r.website_without_scheme(),
                    location: &r.city,
                    country: &r.country,
                    country_code: &r.country_code,
                    org_type: &r.org_type,
                    status: &r.status,
                    established: &r.established,
                    active: r.active_label(),
                })
                .collect();
            serde_json::to_string_pretty(&rows)
        }
    };
    rendered.map_err(|e| DomainError::ExportFailed(e.to_string()))
}

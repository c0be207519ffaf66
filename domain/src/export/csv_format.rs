//! CSV export

use super::ExportLayout;
use crate::core::error::DomainError;
use crate::organisation::record::OrganisationRecord;
use std::io::Write;

pub const BASIC_CSV_HEADER: [&str; 5] = ["Name", "Website", "Location", "Country", "Active"];

pub const EXTENDED_CSV_HEADER: [&str; 9] = [
    "ID", "URL", "Name", "Website", "Location", "Country", "Type", "Status", "Active",
];

/// Render records as CSV with a header row
///
/// Fields containing a comma, quote, CR or LF are quoted and inner quotes
/// doubled; everything else is written bare. Each row ends with `\n`.
pub fn records_to_csv(
    records: &[OrganisationRecord],
    layout: ExportLayout,
) -> Result<String, DomainError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    write_rows(&mut writer, records, layout)
        .map_err(|e| DomainError::ExportFailed(e.to_string()))?;

    let bytes = writer
        .into_inner()
        .map_err(|e| DomainError::ExportFailed(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| DomainError::ExportFailed(e.to_string()))
}

fn write_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    records: &[OrganisationRecord],
    layout: ExportLayout,
) -> Result<(), csv::Error> {
    match layout {
        ExportLayout::Basic => {
            writer.write_record(BASIC_CSV_HEADER)?;
            for r in records {
                writer.write_record([
                    r.name.as_str(),
                    r.website_without_scheme(),
                    r.city.as_str(),
                    r.country.as_str(),
                    r.active_label(),
                ])?;
            }
        }
        ExportLayout::Extended => {
            writer.write_record(EXTENDED_CSV_HEADER)?;
            for r in records {
                writer.write_record([
                    r.id.as_str(),
                    r.url.as_str(),
                    r.name.as_str(),
                    r.website_without_scheme(),
                    r.city.as_str(),
                    r.country.as_str(),
                    r.org_type.as_str(),
                    r.status.as_str(),
                    r.active_label(),
                ])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

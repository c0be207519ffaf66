//! Console output formatter for harvest results

use colored::Colorize;
use ror_domain::core::string::{shorten, strip_scheme};
use ror_domain::{BatchSummary, ExtractedSet, NOT_AVAILABLE, OrganisationRecord};

/// Longest website shown when a record has a single site
const SINGLE_SITE_WIDTH: usize = 40;

/// Longest website shown per site when a record has several
const MULTI_SITE_WIDTH: usize = 20;

/// Batches above this size get a rate-limit reminder in the summary
const LARGE_BATCH_NOTE_THRESHOLD: usize = 1000;

const TABLE_HEADERS: [&str; 5] = ["Organisation Name", "Website", "Location", "Country", "Active"];

/// Formats harvest results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Identifier listing with match counts
    pub fn format_ids(set: &ExtractedSet) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("ROR IDs"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}   {} {}\n\n",
            "Total found:".cyan().bold(),
            set.total_found(),
            "Unique:".cyan().bold(),
            set.unique_count()
        ));

        for id in set {
            output.push_str(&format!("  {}  {}\n", id.as_str().yellow(), id.url().dimmed()));
        }

        output
    }

    /// Organisation table
    pub fn format_table(records: &[OrganisationRecord]) -> String {
        let rows: Vec<[String; 5]> = records.iter().map(Self::table_row).collect();

        let mut widths = TABLE_HEADERS.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut output = String::new();
        output.push_str(&Self::section_header("Organisations"));

        let header = Self::pad_row(&TABLE_HEADERS.map(String::from), &widths);
        output.push_str(&format!("{}\n", header.bold()));
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&format!("{}\n", rule.join("  ").dimmed()));

        for (row, record) in rows.iter().zip(records) {
            let line = Self::pad_row(row, &widths);
            if record.is_placeholder() {
                output.push_str(&format!("{}\n", line.red()));
            } else {
                output.push_str(&line);
                output.push('\n');
            }
        }

        output.push_str(&Self::footer());
        output
    }

    fn table_row(record: &OrganisationRecord) -> [String; 5] {
        [
            record.name.clone(),
            Self::website_display(record),
            record.city.clone(),
            record.country.clone(),
            record.active_label().to_string(),
        ]
    }

    fn pad_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    /// Website column text: scheme stripped and shortened
    ///
    /// A single site keeps up to 40 characters; several comma-separated
    /// sites keep up to 20 each.
    pub fn website_display(record: &OrganisationRecord) -> String {
        let sites = record.websites();
        match sites.as_slice() {
            [] => NOT_AVAILABLE.to_string(),
            [site] => shorten(strip_scheme(site), SINGLE_SITE_WIDTH),
            many => many
                .iter()
                .map(|site| shorten(strip_scheme(site), MULTI_SITE_WIDTH))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Message shown after a successful extraction
    pub fn extraction_message(set: &ExtractedSet) -> String {
        format!("Found {} unique ROR ID(s)!", set.unique_count())
    }

    /// Message shown after a batch completes
    pub fn summary_message(summary: &BatchSummary) -> String {
        let mut message = format!(
            "Successfully fetched details for {} organisation(s)!",
            summary.succeeded
        );
        if summary.failed > 0 {
            message.push_str(&format!(
                " {} request(s) failed (see table for details).",
                summary.failed
            ));
        }
        if summary.total > LARGE_BATCH_NOTE_THRESHOLD {
            message.push_str(
                " Note: Large batches may hit ROR API rate limits (2000 requests per 5 minutes).",
            );
        }
        message
    }

    /// Success notice for stderr
    pub fn success(message: &str) -> String {
        format!("{} {}", "v".green().bold(), message.green())
    }

    /// Error notice for stderr
    pub fn error(message: &str) -> String {
        format!("{} {}", "x".red().bold(), message.red())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ror_domain::{FailureReason, RorId};

    fn record(website: &str) -> OrganisationRecord {
        let mut record = OrganisationRecord::unavailable(RorId::parse("03vek6s52").unwrap());
        record.name = "Harvard University".to_string();
        record.city = "Cambridge".to_string();
        record.country = "United States".to_string();
        record.status = "active".to_string();
        record.website = website.to_string();
        record
    }

    #[test]
    fn test_website_display_single() {
        assert_eq!(
            ConsoleFormatter::website_display(&record("https://www.harvard.edu")),
            "www.harvard.edu"
        );
    }

    #[test]
    fn test_website_display_truncates_long_site() {
        let long = "https://www.example-organisation-with-a-very-long-domain.org/about";
        let display = ConsoleFormatter::website_display(&record(long));
        assert_eq!(display, "www.example-organisation-with-a-very-lon...");
    }

    #[test]
    fn test_website_display_multiple_sites() {
        let display = ConsoleFormatter::website_display(&record(
            "https://www.a-rather-long-site.example, http://b.example",
        ));
        assert_eq!(display, "www.a-rather-long-si..., b.example");
    }

    #[test]
    fn test_website_display_missing() {
        assert_eq!(ConsoleFormatter::website_display(&record(NOT_AVAILABLE)), "N/A");
        assert_eq!(ConsoleFormatter::website_display(&record("  ")), "N/A");
    }

    #[test]
    fn test_table_contains_rows() {
        let failed = OrganisationRecord::placeholder(
            RorId::parse("00hx57361").unwrap(),
            FailureReason::Upstream {
                status: 404,
                message: "Not Found".to_string(),
            },
        );
        let table = ConsoleFormatter::format_table(&[record("https://www.harvard.edu"), failed]);

        assert!(table.contains("Organisation Name"));
        assert!(table.contains("Harvard University"));
        assert!(table.contains("www.harvard.edu"));
        assert!(table.contains("Cambridge"));
        assert!(table.contains("Error 404: Not Found"));
    }

    #[test]
    fn test_format_ids_lists_every_id() {
        let set = ror_domain::extract("https://ror.org/03vek6s52 (00hx57361) (03vek6s52)").unwrap();
        let output = ConsoleFormatter::format_ids(&set);
        assert!(output.contains("03vek6s52"));
        assert!(output.contains("https://ror.org/00hx57361"));
    }

    #[test]
    fn test_extraction_message() {
        let set = ror_domain::extract("00hx57361 03vek6s52").unwrap();
        assert_eq!(
            ConsoleFormatter::extraction_message(&set),
            "Found 2 unique ROR ID(s)!"
        );
    }

    #[test]
    fn test_summary_message() {
        let ok = BatchSummary {
            total: 2,
            succeeded: 2,
            failed: 0,
        };
        assert_eq!(
            ConsoleFormatter::summary_message(&ok),
            "Successfully fetched details for 2 organisation(s)!"
        );

        let mixed = BatchSummary {
            total: 1200,
            succeeded: 1100,
            failed: 100,
        };
        let message = ConsoleFormatter::summary_message(&mixed);
        assert!(message.contains("100 request(s) failed (see table for details)."));
        assert!(message.ends_with("(2000 requests per 5 minutes)."));
    }
}

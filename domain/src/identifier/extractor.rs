//! Identifier extraction from free text
//!
//! Two independent scans run over the input:
//!
//! 1. **URL scan**: `http(s)://ror.org/<id>`, case-insensitive
//! 2. **Standalone scan**: bare nine-character tokens bounded by whitespace
//!    or one of [`TOKEN_DELIMITERS`]
//!
//! Standalone candidates must mix digits and letters; URL matches are
//! trusted as-is. The union is deduplicated and sorted lexicographically.

use super::ror_id::{ROR_ID_LEN, RorId};
use crate::core::error::DomainError;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Characters (besides whitespace) that may border a standalone identifier
pub const TOKEN_DELIMITERS: &[char] = &[
    '(', ')', '[', ']', '{', '}', ':', ',', ';', '"', '|', '\'', '`',
];

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://ror\.org/([0-9a-z]{9})").expect("URL pattern is valid")
});

// Maximal alphanumeric runs; boundaries are checked by hand because the
// regex crate has no lookaround.
static ALNUM_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9A-Za-z]+").expect("run pattern is valid"));

/// Result of one extraction pass (Value Object)
///
/// Holds the unique identifiers in lexicographic order together with the
/// raw match counts, so callers can report "N found, M unique".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedSet {
    ids: Vec<RorId>,
    url_matches: usize,
    standalone_matches: usize,
}

impl ExtractedSet {
    /// Build a set from an already-parsed identifier list, skipping the text scan
    ///
    /// Meant for tests and for callers that hold a list of identifiers
    /// rather than prose. With no URLs involved, every input (duplicates
    /// included) counts as a standalone match and `url_matches()` is zero.
    pub fn new(ids: impl IntoIterator<Item = RorId>) -> Self {
        let ids: Vec<RorId> = ids.into_iter().collect();
        let total = ids.len();
        let unique: BTreeSet<RorId> = ids.into_iter().collect();
        Self {
            ids: unique.into_iter().collect(),
            url_matches: 0,
            standalone_matches: total,
        }
    }

    pub fn ids(&self) -> &[RorId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &RorId> {
        self.ids.iter()
    }

    /// Matches found before deduplication
    pub fn total_found(&self) -> usize {
        self.url_matches + self.standalone_matches
    }

    pub fn url_matches(&self) -> usize {
        self.url_matches
    }

    pub fn standalone_matches(&self) -> usize {
        self.standalone_matches
    }

    pub fn unique_count(&self) -> usize {
        self.ids.len()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// One identifier per line, no trailing newline
    pub fn to_text(&self) -> String {
        self.ids
            .iter()
            .map(RorId::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a ExtractedSet {
    type Item = &'a RorId;
    type IntoIter = std::slice::Iter<'a, RorId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Extract all ROR identifiers from `text`
///
/// Returns [`DomainError::NoIdentifiersFound`] for blank input or when
/// nothing matched; an empty set is never returned.
pub fn extract(text: &str) -> Result<ExtractedSet, DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::NoIdentifiersFound);
    }

    let from_urls = scan_urls(text);
    let standalone = scan_standalone(text);
    let url_matches = from_urls.len();
    let standalone_matches = standalone.len();

    let unique: BTreeSet<RorId> = from_urls.into_iter().chain(standalone).collect();
    if unique.is_empty() {
        return Err(DomainError::NoIdentifiersFound);
    }

    Ok(ExtractedSet {
        ids: unique.into_iter().collect(),
        url_matches,
        standalone_matches,
    })
}

fn scan_urls(text: &str) -> Vec<RorId> {
    URL_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| RorId::parse(m.as_str()).ok())
        .collect()
}

fn scan_standalone(text: &str) -> Vec<RorId> {
    ALNUM_RUN
        .find_iter(text)
        .filter(|m| m.len() == ROR_ID_LEN)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            is_token_boundary(before) && is_token_boundary(after)
        })
        .filter(|m| mixes_digits_and_letters(m.as_str()))
        .filter_map(|m| RorId::parse(m.as_str()).ok())
        .collect()
}

fn is_token_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || TOKEN_DELIMITERS.contains(&c),
    }
}

/// Pure-digit or pure-letter runs are too often numbers or words
fn mixes_digits_and_letters(token: &str) -> bool {
    token.bytes().any(|b| b.is_ascii_digit()) && token.bytes().any(|b| b.is_ascii_alphabetic())
}

//! Identifier subdomain
//!
//! - [`ror_id::RorId`]: a validated, lowercase nine-character ROR ID
//! - [`extractor::extract`]: scans free text for URL-form and bare IDs

pub mod extractor;
pub mod ror_id;

//! Organisation subdomain
//!
//! - [`record::OrganisationRecord`]: normalized registry data (or a placeholder)
//! - [`outcome::FetchOutcome`]: what a single lookup produced
//! - [`batch::BatchResult`]: records for a whole identifier set

pub mod batch;
pub mod outcome;
pub mod record;

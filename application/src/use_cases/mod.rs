//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod harvest_session;
pub mod run_batch;

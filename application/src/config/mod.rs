//! Application-level configuration.
//!
//! - [`FetchPolicy`]: retry, backoff and pacing for the batch lookup loop

pub mod fetch_policy;

pub use fetch_policy::FetchPolicy;

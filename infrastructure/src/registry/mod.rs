//! ROR registry adapter
//!
//! [`RorApiClient`] implements the application's `RegistryGateway` port
//! over HTTP. Response bodies are mapped by [`schema`].

mod client;
pub mod schema;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, RegistryError, RegistrySettings,
    RorApiClient,
};

//! Infrastructure layer for ror-harvest
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod clipboard;
pub mod config;
pub mod registry;
pub mod storage;

// Re-export commonly used types
pub use clipboard::SystemClipboard;
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileFetchConfig, FileOutputConfig,
    FileOutputFormat, FileRegistryConfig,
};
pub use registry::{RegistryError, RegistrySettings, RorApiClient};
pub use storage::LocalArtifactSink;

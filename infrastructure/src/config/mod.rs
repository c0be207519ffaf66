//! Configuration file loading for ror-harvest
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ROR_HARVEST_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./ror-harvest.toml` or `./.ror-harvest.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/ror-harvest/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileFetchConfig, FileOutputConfig, FileOutputFormat,
    FileRegistryConfig,
};
pub use loader::ConfigLoader;

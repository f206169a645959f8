//! Configuration module for webcrawlerapi
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use webcrawlerapi::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webcrawlerapi.toml")).unwrap();
//! println!("Polling at most {} times", config.polling.max_polling_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ApiConfig, Config, PollingConfig, DEFAULT_API_VERSION, DEFAULT_BASE_PATH,
    DEFAULT_INITIAL_PULL_DELAY_MS, DEFAULT_MAX_POLLING_RETRIES,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, read_config};
pub use validation::validate;

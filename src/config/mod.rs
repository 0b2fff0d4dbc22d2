//! Configuration module for bookmark-icons
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional, so an empty file (or no file at all) yields the
//! defaults.
//!
//! # Example
//!
//! ```no_run
//! use bookmark_icons::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("icons.toml")).unwrap();
//! println!("Page timeout: {}s", config.resolver.page_timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheBackend, CacheConfig, Config, ExportConfig, ResolverConfig, DEFAULT_USER_AGENT,
    MAX_TTL_HOURS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;

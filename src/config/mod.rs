//! Configuration module for webharvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use webharvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling with {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, PolicyConfig, SeedEntry, SeenBackend, SeenConfig, UserAgentConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};

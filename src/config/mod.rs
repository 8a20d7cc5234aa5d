//! Configuration loading and management for the payroll engine.
//!
//! This module loads engine settings (directory chunk size, cache TTL and
//! overtime rules) from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Chunk size: {}", config.config().chunk_size);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CacheConfig, DEFAULT_CACHE_TTL_SECONDS, DEFAULT_CHUNK_SIZE, OvertimeConfig, PayrollConfig,
};

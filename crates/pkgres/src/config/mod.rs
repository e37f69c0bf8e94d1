//! Resolver configuration
//!
//! Values are resolved in priority order (highest first):
//!
//! 1. Environment variables (`PKGRES_*`), when enabled
//! 2. A JSON configuration file (kebab-case keys)
//! 3. Built-in defaults
//!
//! ```rust,no_run
//! use pkgres::config::ResolverConfig;
//! use std::path::Path;
//!
//! let config = ResolverConfig::build(Some(Path::new("/etc/pkgres/solver.json")), true).unwrap();
//! println!("Solving for {}", config.architecture);
//! ```

mod config;
mod source;

pub use config::ResolverConfig;
pub use source::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::resolvable::Arch;
use super::source::ConfigLoader;

fn default_architecture() -> String {
    Arch::host().as_str().to_string()
}

fn default_vendor_classes() -> Vec<Vec<String>> {
    vec![vec!["suse".to_string(), "opensuse".to_string()]]
}

fn default_max_solver_passes() -> u32 {
    3
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolverConfig {
    /// System architecture used for installability checks
    #[serde(default = "default_architecture")]
    pub architecture: String,

    /// Vendor-equivalence classes (vendor prefixes, case-insensitive)
    #[serde(default = "default_vendor_classes")]
    pub vendor_classes: Vec<Vec<String>>,

    /// Solver timeout in seconds, 0 = none. Forwarded to the engine only.
    #[serde(default)]
    pub solver_timeout: u64,

    /// Bound on resolve/apply loops driven by `resolve_with_policy`
    #[serde(default = "default_max_solver_passes")]
    pub max_solver_passes: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            architecture: default_architecture(),
            vendor_classes: default_vendor_classes(),
            solver_timeout: 0,
            max_solver_passes: default_max_solver_passes(),
        }
    }
}

impl ResolverConfig {
    /// Defaults overlaid with a JSON file and, if enabled, the environment.
    pub fn build(file: Option<&Path>, use_environment: bool) -> Result<Self> {
        let loader = ConfigLoader::new(use_environment);

        let mut config = match file {
            Some(path) => loader.load_config_file(path)?,
            None => loader.load_global_config()?,
        };

        loader.apply_environment(&mut config)?;
        Ok(config)
    }

    /// Configuration for a given system architecture, defaults otherwise
    pub fn for_arch(arch: impl Into<String>) -> Self {
        ResolverConfig {
            architecture: arch.into(),
            ..Default::default()
        }
    }

    pub fn arch(&self) -> Arch {
        Arch::new(self.architecture.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.solver_timeout > 0).then(|| Duration::from_secs(self.solver_timeout))
    }
}

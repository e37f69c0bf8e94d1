use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ResolverError, Result};
use super::config::ResolverConfig;

/// Loads resolver configuration from files and the environment
#[derive(Debug)]
pub struct ConfigLoader {
    use_environment: bool,
}

impl ConfigLoader {
    pub fn new(use_environment: bool) -> Self {
        Self { use_environment }
    }

    /// Get a PKGRES_* environment variable
    pub fn get_env(&self, var: &str) -> Option<String> {
        if !self.use_environment {
            return None;
        }

        env::var(var).ok().filter(|s| !s.is_empty())
    }

    /// Location of the global configuration file
    pub fn global_config_path(&self) -> PathBuf {
        if let Some(path) = self.get_env("PKGRES_CONFIG") {
            return PathBuf::from(path);
        }

        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "pkgres") {
            proj_dirs.config_dir().join("solver.json")
        } else {
            PathBuf::from(".pkgres").join("solver.json")
        }
    }

    /// Load configuration from a JSON file. A missing file yields the defaults.
    pub fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<ResolverConfig> {
        let path = path.as_ref();

        if !path.exists() {
            log::debug!("No resolver config at {}, using defaults", path.display());
            return Ok(ResolverConfig::default());
        }

        let contents = fs::read_to_string(path)?;

        let config: ResolverConfig = serde_json::from_str(&contents)?;

        Ok(config)
    }

    pub fn load_global_config(&self) -> Result<ResolverConfig> {
        self.load_config_file(self.global_config_path())
    }

    /// Override values from PKGRES_ARCH, PKGRES_SOLVER_TIMEOUT and PKGRES_MAX_SOLVER_PASSES
    pub fn apply_environment(&self, config: &mut ResolverConfig) -> Result<()> {
        if let Some(arch) = self.get_env("PKGRES_ARCH") {
            config.architecture = arch;
        }
        if let Some(timeout) = self.get_env("PKGRES_SOLVER_TIMEOUT") {
            config.solver_timeout = timeout.parse().map_err(|_| {
                ResolverError::Config(format!("PKGRES_SOLVER_TIMEOUT is not a number: {}", timeout))
            })?;
        }
        if let Some(passes) = self.get_env("PKGRES_MAX_SOLVER_PASSES") {
            config.max_solver_passes = passes.parse().map_err(|_| {
                ResolverError::Config(format!("PKGRES_MAX_SOLVER_PASSES is not a number: {}", passes))
            })?;
        }
        Ok(())
    }
}

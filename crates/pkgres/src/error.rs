use thiserror::Error;

use crate::pool::PoolItemId;
use crate::solver::Action;

#[derive(Error, Debug)]
pub enum ResolverError {
    // Solver errors
    #[error("Could not resolve dependencies: {problems} problem(s) found")]
    Unsatisfiable { problems: usize },

    // Pool errors
    #[error("Pool item not found: {0}")]
    ItemNotFound(PoolItemId),

    // Solution errors
    #[error("Cannot {action} {item}: status transition rejected")]
    SolutionRejected { item: String, action: Action },

    // Resolvable errors
    #[error("Unknown resolvable kind: {0}")]
    UnknownKind(String),

    #[error("Invalid capability: {0}")]
    Capability(#[from] pkgres_evr::CapabilityError),

    #[error("Invalid edition: {0}")]
    Edition(#[from] pkgres_evr::EditionError),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    JsonParse(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ResolverError>;

//! Dependency-resolution core of a package manager.
//!
//! Pending install, remove, lock and keep requests are collected from a
//! [`ResPool`], handed to a satisfiability engine and the outcome is written
//! back as per-item transaction statuses. When no consistent target state
//! exists the resolver reports [`ResolverProblem`]s, each with alternative
//! [`ProblemSolution`]s the caller can apply before resolving again.

pub mod config;
pub mod error;
pub mod pool;
pub mod resolvable;
pub mod solver;
pub mod status;

pub use config::{ConfigLoader, ResolverConfig};
pub use error::{ResolverError, Result};
pub use pool::{PoolItem, PoolItemId, ResPool, Universe};
pub use resolvable::{Arch, KindDetails, ResKind, Resolvable};
pub use solver::{
    Action, BasicEngine, ProblemKind, ProblemSolution, ResolverProblem, SatEngine, SatResolver,
    SingleAction,
};
pub use status::{Causer, ResStatus, TransactState};

pub use pkgres_evr::{Capability, Edition};

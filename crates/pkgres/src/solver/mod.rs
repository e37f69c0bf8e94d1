//! Resolver control layer around a satisfiability engine.
//!
//! One resolve pass runs these steps:
//!
//! 1. [`collect_transactions`] turns pending pool transactions into
//!    [`RequestLists`];
//! 2. [`build_job`] orders them into a [`Job`];
//! 3. a [`SolverSession`] runs a [`SatEngine`] on it;
//! 4. on success [`apply_decisions`] writes the decisions back into the pool,
//!    on failure [`analyze_problems`] builds [`ResolverProblem`]s;
//! 5. the caller picks [`ProblemSolution`]s and hands them to
//!    [`apply_solution`] before the next pass.
//!
//! [`SatResolver`] drives the whole loop.
//!
//! # Example
//!
//! ```
//! use pkgres::{Arch, ResPool, Resolvable, SatResolver};
//!
//! let mut pool = ResPool::new(Arch::new("x86_64"));
//! let editor = pool.add_available(
//!     Resolvable::package("editor", "2.0")?.with_arch("x86_64").requires("libfoo >= 3")?,
//! );
//!
//! let mut resolver = SatResolver::new(pool);
//! resolver.add_to_install(editor);
//! assert!(resolver.resolve().is_err());
//! assert_eq!(resolver.problems()[0].description(), "nothing provides libfoo >= 3 needed by editor-2.0.x86_64");
//! # Ok::<(), pkgres::ResolverError>(())
//! ```

mod basic;
mod decisions;
mod engine;
mod job;
mod problem;
mod request;
mod resolver;
mod session;
mod solution;

pub use basic::{BasicEngine, BasicRun};
pub use decisions::{apply_decisions, write_back, AppliedSet};
pub use engine::{
    DecisionSet, EngineProblem, ProblemRule, ProblemRuleKind, SatEngine, SolutionElement,
    SolverFlags, SolverHandle,
};
pub use job::{build_job, Job, JobEntry, JobOp};
pub use problem::{
    analyze_problems, describe_rule, replacement_reason, Action, ProblemKind, ProblemSolution,
    ReplacementReason, ResolverProblem, SingleAction,
};
pub use request::{collect_transactions, RequestLists, StaleTransactions};
pub use resolver::SatResolver;
pub use session::SolverSession;
pub use solution::apply_solution;

#[cfg(test)]
mod tests;

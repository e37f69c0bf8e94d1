//! The boundary between the resolver and a satisfiability engine.
//!
//! An engine receives a [`Job`], the package [`Universe`] and fixed
//! [`SolverFlags`], and hands back an owned [`SolverHandle`] that answers with
//! either a decision set or an enumeration of problems.

use std::collections::HashMap;
use std::time::Duration;

use pkgres_evr::Capability;

use super::job::Job;
use crate::pool::{SolvableId, Universe};

/// Policy flags for one solve invocation. Everything is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverFlags {
    /// Treat the installed set as broken and fixable
    pub fix_system: bool,
    /// Implicitly update every installed solvable
    pub update_system: bool,
    pub allow_downgrade: bool,
    pub allow_uninstall: bool,
    pub allow_arch_change: bool,
    pub allow_vendor_change: bool,
    /// Suppress update-provides reasoning
    pub no_update_provide: bool,
    /// Accepted and forwarded; enforcement is up to the engine.
    pub timeout: Option<Duration>,
}

/// Verdict per considered solvable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionSet {
    order: Vec<SolvableId>,
    verdicts: HashMap<SolvableId, bool>,
}

impl DecisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verdict. A later verdict for the same solvable replaces the
    /// earlier one but keeps its position.
    pub fn decide(&mut self, id: SolvableId, selected: bool) {
        if self.verdicts.insert(id, selected).is_none() {
            self.order.push(id);
        }
    }

    pub fn is_selected(&self, id: SolvableId) -> bool {
        self.verdicts.get(&id).copied().unwrap_or(false)
    }

    pub fn is_decided(&self, id: SolvableId) -> bool {
        self.verdicts.contains_key(&id)
    }

    /// Verdicts in decision order
    pub fn iter(&self) -> impl Iterator<Item = (SolvableId, bool)> + '_ {
        self.order.iter().map(move |id| (*id, self.verdicts[id]))
    }

    pub fn selected(&self) -> impl Iterator<Item = SolvableId> + '_ {
        self.iter().filter(|(_, selected)| *selected).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Kind of the rule an engine found unsatisfiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemRuleKind {
    /// An installed solvable cannot stay as it is
    UpdateRule,
    /// Job entries contradict each other
    JobRule,
    /// A job asks for something nothing provides
    JobNothingProvidesDep,
    NotInstallable,
    NothingProvidesDep,
    SameName,
    PackageConflict,
    PackageObsoletes,
    DepProvidersNotInstallable,
}

/// Data of an unsatisfiable rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemRule {
    pub kind: ProblemRuleKind,
    /// Solvable the rule originates from
    pub source: SolvableId,
    /// Counterpart, for two-sided rules
    pub target: Option<SolvableId>,
    /// Dependency involved, if any
    pub dep: Option<Capability>,
}

/// One remedy element proposed by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolutionElement {
    /// Drop the job entry at `index`
    Job { index: usize },
    /// Relax policy: replace `from` with `to`, or give `from` up entirely.
    Policy {
        from: SolvableId,
        to: Option<SolvableId>,
    },
}

/// A problem as the engine reports it: the rule and its candidate remedies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineProblem {
    pub rule: ProblemRule,
    pub solutions: Vec<Vec<SolutionElement>>,
}

/// Owned result of one solve invocation.
pub trait SolverHandle {
    fn problem_count(&self) -> usize;

    /// Problems in discovery order; empty after success.
    fn problems(&self) -> &[EngineProblem];

    /// Final decisions; only meaningful with zero problems.
    fn decisions(&self) -> &DecisionSet;
}

/// A satisfiability engine.
pub trait SatEngine {
    type Handle: SolverHandle;

    fn solve(&self, universe: &Universe, job: &Job, flags: &SolverFlags) -> Self::Handle;
}

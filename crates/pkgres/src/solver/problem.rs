//! Turn the problems of a failed solve into domain problems and remedies.

use std::fmt;

use pkgres_evr::Capability;

use super::engine::{EngineProblem, ProblemRule, ProblemRuleKind, SolutionElement, SolverHandle};
use super::job::JobOp;
use super::session::SolverSession;
use crate::pool::{PoolItemId, ResPool, SolvableId, Universe};

/// Category of an unsatisfiable rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    UpdateRuleConflict,
    JobRuleConflict,
    JobRequestsUnavailableDependency,
    CandidateNotInstallable,
    DependencyUnavailable,
    SameNameConflict,
    PackageConflict,
    PackageObsoletesConflict,
    NoInstallableProvider,
}

impl ProblemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemKind::UpdateRuleConflict => "update-rule-conflict",
            ProblemKind::JobRuleConflict => "job-rule-conflict",
            ProblemKind::JobRequestsUnavailableDependency => "job-requests-unavailable-dependency",
            ProblemKind::CandidateNotInstallable => "candidate-not-installable",
            ProblemKind::DependencyUnavailable => "dependency-unavailable",
            ProblemKind::SameNameConflict => "same-name-conflict",
            ProblemKind::PackageConflict => "package-conflict",
            ProblemKind::PackageObsoletesConflict => "package-obsoletes-conflict",
            ProblemKind::NoInstallableProvider => "no-installable-provider",
        }
    }
}

impl From<ProblemRuleKind> for ProblemKind {
    fn from(kind: ProblemRuleKind) -> Self {
        match kind {
            ProblemRuleKind::UpdateRule => ProblemKind::UpdateRuleConflict,
            ProblemRuleKind::JobRule => ProblemKind::JobRuleConflict,
            ProblemRuleKind::JobNothingProvidesDep => ProblemKind::JobRequestsUnavailableDependency,
            ProblemRuleKind::NotInstallable => ProblemKind::CandidateNotInstallable,
            ProblemRuleKind::NothingProvidesDep => ProblemKind::DependencyUnavailable,
            ProblemRuleKind::SameName => ProblemKind::SameNameConflict,
            ProblemRuleKind::PackageConflict => ProblemKind::PackageConflict,
            ProblemRuleKind::PackageObsoletes => ProblemKind::PackageObsoletesConflict,
            ProblemRuleKind::DepProvidersNotInstallable => ProblemKind::NoInstallableProvider,
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Install,
    Remove,
    Keep,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Remove => "remove",
            Action::Keep => "keep",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic step of a remedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SingleAction {
    pub item: PoolItemId,
    pub action: Action,
}

/// Why a policy-relaxation remedy swaps one candidate for another. The first
/// matching reason, in declaration order, is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementReason {
    Downgrade,
    ArchChange,
    VendorChange,
    Replacement,
}

/// One self-consistent alternative remedy for a problem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemSolution {
    actions: Vec<SingleAction>,
    details: Vec<String>,
    unrepresentable: Vec<String>,
}

impl ProblemSolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, item: PoolItemId, action: Action) -> &mut Self {
        self.actions.push(SingleAction { item, action });
        self
    }

    pub fn add_detail(&mut self, detail: impl Into<String>) -> &mut Self {
        self.details.push(detail.into());
        self
    }

    pub fn actions(&self) -> &[SingleAction] {
        &self.actions
    }

    /// Remedy descriptions, one per element
    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// Elements that could not be expressed as actions
    pub fn unrepresentable(&self) -> &[String] {
        &self.unrepresentable
    }

    /// Whether some element of the remedy was dropped.
    pub fn is_degraded(&self) -> bool {
        !self.unrepresentable.is_empty()
    }

    pub fn description(&self) -> String {
        self.details.join(", ")
    }
}

/// An unsatisfiable constraint with its alternative remedies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverProblem {
    kind: ProblemKind,
    description: String,
    solutions: Vec<ProblemSolution>,
}

impl ResolverProblem {
    pub fn kind(&self) -> ProblemKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn solutions(&self) -> &[ProblemSolution] {
        &self.solutions
    }
}

impl fmt::Display for ResolverProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;
        for (i, solution) in self.solutions.iter().enumerate() {
            write!(f, "\n  Solution {}: {}", i + 1, solution.description())?;
        }
        Ok(())
    }
}

/// Fixed-format description of an unsatisfiable rule.
pub fn describe_rule(universe: &Universe, rule: &ProblemRule) -> String {
    let source = universe.describe(rule.source);
    let target = rule
        .target
        .map(|id| universe.describe(id))
        .unwrap_or_else(|| "<unknown>".to_string());
    let dep = rule.dep.as_ref().map(Capability::to_string).unwrap_or_default();

    match rule.kind {
        ProblemRuleKind::UpdateRule => format!("problem with installed package {}", source),
        ProblemRuleKind::JobRule => "conflicting requests".to_string(),
        ProblemRuleKind::JobNothingProvidesDep => format!("nothing provides requested {}", dep),
        ProblemRuleKind::NotInstallable => format!("package {} is not installable", source),
        ProblemRuleKind::NothingProvidesDep => format!("nothing provides {} needed by {}", dep, source),
        ProblemRuleKind::SameName => format!("cannot install both {} and {}", source, target),
        ProblemRuleKind::PackageConflict => {
            format!("package {} conflicts with {} provided by {}", source, dep, target)
        }
        ProblemRuleKind::PackageObsoletes => {
            format!("package {} obsoletes {} provided by {}", source, dep, target)
        }
        ProblemRuleKind::DepProvidersNotInstallable => format!(
            "package {} requires {}, but none of the providers can be installed",
            source, dep
        ),
    }
}

/// First matching reason for replacing `from` with `to`.
pub fn replacement_reason(universe: &Universe, from: SolvableId, to: SolvableId) -> ReplacementReason {
    let (Some(from), Some(to)) = (universe.solvable(from), universe.solvable(to)) else {
        return ReplacementReason::Replacement;
    };

    if to.edition() < from.edition() {
        ReplacementReason::Downgrade
    } else if to.name() == from.name() && to.arch() != from.arch() {
        ReplacementReason::ArchChange
    } else if to.name() == from.name()
        && universe.vendor_classes().is_vendor_change(from.vendor(), to.vendor())
    {
        ReplacementReason::VendorChange
    } else {
        ReplacementReason::Replacement
    }
}

/// Build domain problems from a failed session. Never touches the pool.
pub fn analyze_problems<H: SolverHandle>(pool: &ResPool, session: &SolverSession<H>) -> Vec<ResolverProblem> {
    let mut problems = Vec::with_capacity(session.problem_count());

    log::info!("Encountered {} problem(s)", session.problem_count());
    for (n, engine_problem) in session.problems().iter().enumerate() {
        let problem = analyze_problem(pool, session, engine_problem);
        log::info!("Problem {}: {}", n + 1, problem.description);
        for solution in &problem.solutions {
            log::info!("  - {}", solution.description());
        }
        problems.push(problem);
    }

    problems
}

fn analyze_problem<H: SolverHandle>(
    pool: &ResPool,
    session: &SolverSession<H>,
    engine_problem: &EngineProblem,
) -> ResolverProblem {
    let universe = pool.universe();
    let solutions = engine_problem
        .solutions
        .iter()
        .map(|elements| {
            let mut solution = ProblemSolution::new();
            for element in elements {
                apply_element(pool, session, *element, &mut solution);
            }
            solution
        })
        .collect();

    ResolverProblem {
        kind: engine_problem.rule.kind.into(),
        description: describe_rule(universe, &engine_problem.rule),
        solutions,
    }
}

fn unrepresentable(solution: &mut ProblemSolution, detail: String) {
    log::error!("No valid solution available for: {}", detail);
    solution.details.push(detail.clone());
    solution.unrepresentable.push(detail);
}

fn apply_element<H: SolverHandle>(
    pool: &ResPool,
    session: &SolverSession<H>,
    element: SolutionElement,
    solution: &mut ProblemSolution,
) {
    let universe = pool.universe();

    match element {
        SolutionElement::Job { index } => {
            let Some(entry) = session.job().get(index) else {
                unrepresentable(solution, format!("job #{} does not exist", index));
                return;
            };
            let what = universe.describe(entry.target);
            let installed = universe.is_installed(entry.target);

            match entry.op {
                JobOp::InstallSolvable | JobOp::EraseSolvable => {
                    let Some(item) = pool.find(entry.target) else {
                        log::error!("{}: no item found for {}", entry.op, what);
                        return;
                    };
                    let (action, detail) = match (entry.op, installed) {
                        (JobOp::InstallSolvable, true) => (Action::Remove, format!("do not keep {} installed", what)),
                        (JobOp::InstallSolvable, false) => (Action::Keep, format!("do not install {}", what)),
                        (_, true) => (Action::Keep, format!("do not deinstall {}", what)),
                        (_, false) => (Action::Install, format!("do not forbid installation of {}", what)),
                    };
                    solution.add_action(item, action).add_detail(detail);
                }
                JobOp::InstallSolvableName => {
                    unrepresentable(solution, format!("do not install {}", what))
                }
                JobOp::EraseSolvableName => {
                    unrepresentable(solution, format!("do not deinstall {}", what))
                }
                JobOp::InstallSolvableProvides => unrepresentable(
                    solution,
                    format!("do not install a solvable providing {}", what),
                ),
                JobOp::EraseSolvableProvides => unrepresentable(
                    solution,
                    format!("do not deinstall all solvables providing {}", what),
                ),
                JobOp::InstallSolvableUpdate => unrepresentable(
                    solution,
                    format!("do not install most recent version of {}", what),
                ),
            }
        }
        SolutionElement::Policy { from, to: Some(to) } => {
            let (Some(item_from), Some(item_to)) = (pool.find(from), pool.find(to)) else {
                log::error!("{} or {} not found", universe.describe(from), universe.describe(to));
                return;
            };
            solution.add_action(item_to, Action::Install);
            solution.add_action(item_from, Action::Remove);

            let (from_name, to_name) = (universe.describe(from), universe.describe(to));
            let detail = match replacement_reason(universe, from, to) {
                ReplacementReason::Downgrade => format!("allow downgrade of {} to {}", from_name, to_name),
                ReplacementReason::ArchChange => {
                    format!("allow architecture change of {} to {}", from_name, to_name)
                }
                ReplacementReason::VendorChange => {
                    let vendor = |id| {
                        universe
                            .solvable(id)
                            .map(|s| s.vendor())
                            .filter(|v| !v.is_empty())
                            .unwrap_or("(no vendor)")
                            .to_string()
                    };
                    format!(
                        "allow vendor change of {} {} to {} {}",
                        vendor(from),
                        from_name,
                        vendor(to),
                        to_name
                    )
                }
                ReplacementReason::Replacement => {
                    format!("allow replacement of {} with {}", from_name, to_name)
                }
            };
            solution.add_detail(detail);
        }
        SolutionElement::Policy { from, to: None } => match pool.find(from) {
            Some(item) => {
                solution
                    .add_action(item, Action::Remove)
                    .add_detail(format!("allow removal of {}", universe.describe(from)));
            }
            None => log::error!("{} not found", universe.describe(from)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::pool::VendorClasses;
    use crate::resolvable::{Arch, Resolvable};
    use crate::solver::{BasicEngine, BasicRun, DecisionSet, Job, SatEngine, SolverFlags};
    use std::sync::Arc;

    /// Engine that always reports the same problems.
    struct FailingEngine(Vec<EngineProblem>);

    struct FailedRun {
        problems: Vec<EngineProblem>,
        decisions: DecisionSet,
    }

    impl SolverHandle for FailedRun {
        fn problem_count(&self) -> usize {
            self.problems.len()
        }

        fn problems(&self) -> &[EngineProblem] {
            &self.problems
        }

        fn decisions(&self) -> &DecisionSet {
            &self.decisions
        }
    }

    impl SatEngine for FailingEngine {
        type Handle = FailedRun;

        fn solve(&self, _universe: &Universe, _job: &Job, _flags: &SolverFlags) -> FailedRun {
            FailedRun {
                problems: self.0.clone(),
                decisions: DecisionSet::new(),
            }
        }
    }

    fn pkg(name: &str, edition: &str) -> Resolvable {
        Resolvable::package(name, edition).unwrap().with_arch("x86_64")
    }

    fn solve(pool: &ResPool, job: Job) -> SolverSession<BasicRun> {
        SolverSession::solve(&BasicEngine, pool.universe(), job, &ResolverConfig::for_arch("x86_64"))
    }

    fn solvable(pool: &ResPool, item: PoolItemId) -> SolvableId {
        pool.item(item).unwrap().solvable().unwrap()
    }

    #[test]
    fn test_dependency_unavailable() {
        let mut pool = ResPool::new(Arch::new("x86_64"));
        let editor = pool.add_available(pkg("editor", "2.0").requires("libfoo >= 3").unwrap());
        let mut job = Job::new();
        job.push(JobOp::InstallSolvable, solvable(&pool, editor));

        let problems = analyze_problems(&pool, &solve(&pool, job));
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind(), ProblemKind::DependencyUnavailable);
        assert_eq!(problems[0].description(), "nothing provides libfoo >= 3 needed by editor-2.0.x86_64");

        let solution = &problems[0].solutions()[0];
        assert_eq!(solution.actions(), &[SingleAction { item: editor, action: Action::Keep }]);
        assert_eq!(solution.details(), &["do not install editor-2.0.x86_64".to_string()]);
        assert!(!solution.is_degraded());
    }

    #[test]
    fn test_same_name_conflict_solutions() {
        let mut pool = ResPool::new(Arch::new("x86_64"));
        let old = pool.add_installed(pkg("app", "0.9"));
        let new = pool.add_available(pkg("app", "1.0"));
        let mut job = Job::new();
        job.push(JobOp::InstallSolvable, solvable(&pool, new));

        let problems = analyze_problems(&pool, &solve(&pool, job));
        assert_eq!(problems[0].kind(), ProblemKind::SameNameConflict);
        assert_eq!(problems[0].description(), "cannot install both app-1.0.x86_64 and app-0.9.x86_64");

        let replace = &problems[0].solutions()[1];
        assert_eq!(
            replace.actions(),
            &[
                SingleAction { item: new, action: Action::Install },
                SingleAction { item: old, action: Action::Remove },
            ]
        );
        assert_eq!(
            replace.description(),
            "allow replacement of app-0.9.x86_64 with app-1.0.x86_64"
        );
    }

    #[test]
    fn test_erase_job_elements() {
        let mut pool = ResPool::new(Arch::new("x86_64"));
        let lib = pool.add_installed(pkg("libfoo", "3.0"));
        let editor = pool.add_installed(pkg("editor", "2.0").requires("libfoo").unwrap());
        let mut job = Job::new();
        job.push(JobOp::EraseSolvable, solvable(&pool, lib));

        let problems = analyze_problems(&pool, &solve(&pool, job));
        assert_eq!(problems[0].kind(), ProblemKind::UpdateRuleConflict);
        assert_eq!(problems[0].description(), "problem with installed package editor-2.0.x86_64");
        let solutions = problems[0].solutions();
        assert_eq!(solutions[0].actions(), &[SingleAction { item: lib, action: Action::Keep }]);
        assert_eq!(solutions[1].actions(), &[SingleAction { item: editor, action: Action::Remove }]);
    }

    #[test]
    fn test_name_jobs_are_unrepresentable() {
        let mut pool = ResPool::new(Arch::new("x86_64"));
        let lib = pool.add_installed(pkg("libfoo", "3.0"));
        pool.add_installed(pkg("editor", "2.0").requires("libfoo").unwrap());
        let mut job = Job::new();
        job.push(JobOp::EraseSolvableName, solvable(&pool, lib));

        let problems = analyze_problems(&pool, &solve(&pool, job));
        let degraded = &problems[0].solutions()[0];
        assert!(degraded.is_degraded());
        assert!(degraded.actions().is_empty());
        assert_eq!(degraded.unrepresentable(), &["do not deinstall libfoo-3.0.x86_64".to_string()]);
        // the other remedy is still enumerated
        assert!(!problems[0].solutions()[1].is_degraded());
    }

    #[test]
    fn test_replacement_reasons_first_match_wins() {
        let mut universe = Universe::new(
            Arch::new("x86_64"),
            VendorClasses::new(&[vec!["suse".to_string()], vec!["packman".to_string()]]),
        );
        let installed = universe.add(Arc::new(pkg("app", "2.0").with_vendor("SUSE")), true);
        let older_packman = universe.add(Arc::new(pkg("app", "1.0").with_vendor("Packman")), false);
        let i586 = universe.add(
            Arc::new(Resolvable::package("app", "2.0").unwrap().with_arch("i586").with_vendor("SUSE")),
            false,
        );
        let packman = universe.add(Arc::new(pkg("app", "2.1").with_vendor("Packman")), false);
        let other = universe.add(Arc::new(pkg("app-ng", "3.0").with_vendor("SUSE")), false);

        assert_eq!(replacement_reason(&universe, installed, older_packman), ReplacementReason::Downgrade);
        assert_eq!(replacement_reason(&universe, installed, i586), ReplacementReason::ArchChange);
        assert_eq!(replacement_reason(&universe, installed, packman), ReplacementReason::VendorChange);
        assert_eq!(replacement_reason(&universe, installed, other), ReplacementReason::Replacement);
    }

    #[test]
    fn test_descriptions() {
        let mut universe = Universe::new(Arch::new("x86_64"), VendorClasses::default());
        let a = universe.add(Arc::new(pkg("sendmail", "8.0")), false);
        let b = universe.add(Arc::new(pkg("postfix", "3.0")), true);
        let rule = |kind, dep: Option<&str>| ProblemRule {
            kind,
            source: a,
            target: Some(b),
            dep: dep.map(|d| Capability::parse(d).unwrap()),
        };

        assert_eq!(
            describe_rule(&universe, &rule(ProblemRuleKind::PackageConflict, Some("smtp_daemon"))),
            "package sendmail-8.0.x86_64 conflicts with smtp_daemon provided by postfix-3.0.x86_64"
        );
        assert_eq!(
            describe_rule(&universe, &rule(ProblemRuleKind::DepProvidersNotInstallable, Some("libc"))),
            "package sendmail-8.0.x86_64 requires libc, but none of the providers can be installed"
        );
        assert_eq!(describe_rule(&universe, &rule(ProblemRuleKind::JobRule, None)), "conflicting requests");
        assert_eq!(
            describe_rule(&universe, &rule(ProblemRuleKind::JobNothingProvidesDep, Some("vim"))),
            "nothing provides requested vim"
        );
    }

    #[test]
    fn test_unknown_replacement_target_is_skipped() {
        let mut pool = ResPool::new(Arch::new("x86_64"));
        let old = pool.add_installed(pkg("app", "0.9"));
        let new = pool.add_available(pkg("app", "1.0"));
        let (old_id, new_id) = (solvable(&pool, old), solvable(&pool, new));

        let engine = FailingEngine(vec![EngineProblem {
            rule: ProblemRule {
                kind: ProblemRuleKind::SameName,
                source: new_id,
                target: Some(old_id),
                dep: None,
            },
            solutions: vec![
                vec![SolutionElement::Policy { from: old_id, to: Some(999) }],
                vec![SolutionElement::Policy { from: old_id, to: Some(new_id) }],
            ],
        }]);
        let session = SolverSession::solve(&engine, pool.universe(), Job::new(), &ResolverConfig::default());

        let problems = analyze_problems(&pool, &session);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].kind(), ProblemKind::SameNameConflict);
        let solutions = problems[0].solutions();
        assert_eq!(solutions.len(), 2);
        assert!(solutions[0].actions().is_empty());
        assert_eq!(
            solutions[1].actions(),
            &[
                SingleAction { item: new, action: Action::Install },
                SingleAction { item: old, action: Action::Remove },
            ]
        );
    }
}

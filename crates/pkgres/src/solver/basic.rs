//! A deterministic reference engine for in-memory universes.
//!
//! It runs erase jobs first, then each install job as a dependency closure
//! that is committed only when every pulled-in solvable fits. It is not a
//! backtracking solver: the first provider of a dependency is the one with
//! the highest edition. Of the policy flags only `allow_uninstall` changes
//! its behavior.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use pkgres_evr::Capability;

use super::engine::{
    DecisionSet, EngineProblem, ProblemRule, ProblemRuleKind, SatEngine, SolutionElement,
    SolverFlags, SolverHandle,
};
use super::job::{Job, JobOp};
use crate::pool::{Solvable, SolvableId, Universe};

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicEngine;

/// Outcome of one [`BasicEngine`] run.
#[derive(Debug, Default)]
pub struct BasicRun {
    problems: Vec<EngineProblem>,
    decisions: DecisionSet,
}

impl SolverHandle for BasicRun {
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

impl SatEngine for BasicEngine {
    type Handle = BasicRun;

    fn solve(&self, universe: &Universe, job: &Job, flags: &SolverFlags) -> BasicRun {
        if let Some(timeout) = flags.timeout {
            log::debug!("Timeout of {:?} accepted, not enforced", timeout);
        }

        let mut state = SolveState::new(universe, flags);
        state.run(job);
        state.finish()
    }
}

/// Solvables pulled in by one install job, not yet committed.
#[derive(Debug, Default)]
struct Plan {
    pending: Vec<SolvableId>,
    /// Installed solvables the plan replaces
    replacing: Vec<SolvableId>,
}

struct SolveState<'a> {
    universe: &'a Universe,
    flags: &'a SolverFlags,
    selected: BTreeSet<SolvableId>,
    /// Erase-job targets, with the erasing job
    erased: HashMap<SolvableId, usize>,
    /// Installed solvables dropped by a job
    removed_by: HashMap<SolvableId, usize>,
    /// Newly selected solvables, with the job that pulled them in
    selected_by: HashMap<SolvableId, usize>,
    problems: Vec<EngineProblem>,
}

impl<'a> SolveState<'a> {
    fn new(universe: &'a Universe, flags: &'a SolverFlags) -> Self {
        Self {
            universe,
            flags,
            selected: universe.installed().map(Solvable::id).collect(),
            erased: HashMap::new(),
            removed_by: HashMap::new(),
            selected_by: HashMap::new(),
            problems: Vec::new(),
        }
    }

    fn run(&mut self, job: &Job) {
        for (index, entry) in job.entries().iter().enumerate() {
            match entry.op {
                JobOp::EraseSolvable => self.erase(index, vec![entry.target]),
                JobOp::EraseSolvableName => {
                    let targets = self.installed_same_name(entry.target);
                    self.erase(index, targets);
                }
                _ => {}
            }
        }

        for (index, entry) in job.entries().iter().enumerate() {
            match entry.op {
                JobOp::InstallSolvable => self.install(index, entry.target, false),
                JobOp::InstallSolvableName => self.install_by_name(index, entry.target),
                JobOp::InstallSolvableUpdate => self.install_update(index, entry.target),
                JobOp::InstallSolvableProvides | JobOp::EraseSolvableProvides => {
                    log::warn!("{} is not supported by this engine", entry.op);
                    self.report(ProblemRuleKind::JobRule, entry.target, None, None, vec![vec![
                        SolutionElement::Job { index },
                    ]]);
                }
                JobOp::EraseSolvable | JobOp::EraseSolvableName => {}
            }
        }

        self.check_installed_requires();
    }

    fn finish(self) -> BasicRun {
        let mut decisions = DecisionSet::new();
        if self.problems.is_empty() {
            for solvable in self.universe.iter() {
                decisions.decide(solvable.id(), self.selected.contains(&solvable.id()));
            }
        }
        BasicRun {
            problems: self.problems,
            decisions,
        }
    }

    fn report(
        &mut self,
        kind: ProblemRuleKind,
        source: SolvableId,
        target: Option<SolvableId>,
        dep: Option<Capability>,
        solutions: Vec<Vec<SolutionElement>>,
    ) {
        self.problems.push(EngineProblem {
            rule: ProblemRule {
                kind,
                source,
                target,
                dep,
            },
            solutions,
        });
    }

    fn installed_same_name(&self, target: SolvableId) -> Vec<SolvableId> {
        let Some(solvable) = self.universe.solvable(target) else {
            return Vec::new();
        };
        self.universe
            .by_name(solvable.kind(), solvable.name())
            .iter()
            .copied()
            .filter(|id| self.universe.is_installed(*id))
            .collect()
    }

    fn erase(&mut self, index: usize, targets: Vec<SolvableId>) {
        for id in targets {
            self.erased.entry(id).or_insert(index);
            if self.selected.remove(&id) {
                self.removed_by.entry(id).or_insert(index);
            }
        }
    }

    fn install_by_name(&mut self, index: usize, target: SolvableId) {
        let universe = self.universe;
        let Some(solvable) = universe.solvable(target) else {
            self.report(ProblemRuleKind::NotInstallable, target, None, None, vec![vec![
                SolutionElement::Job { index },
            ]]);
            return;
        };

        let best = universe
            .by_name(solvable.kind(), solvable.name())
            .iter()
            .copied()
            .filter(|id| universe.is_installable(*id) && !self.erased.contains_key(id))
            .max_by(|a, b| self.compare_candidates(*a, *b));

        match best {
            Some(id) => self.install(index, id, false),
            None => self.report(
                ProblemRuleKind::JobNothingProvidesDep,
                target,
                None,
                Some(Capability::named(solvable.name())),
                vec![vec![SolutionElement::Job { index }]],
            ),
        }
    }

    fn install_update(&mut self, index: usize, target: SolvableId) {
        let universe = self.universe;
        let Some(installed) = universe.solvable(target) else {
            return;
        };

        let best = universe
            .by_name(installed.kind(), installed.name())
            .iter()
            .copied()
            .filter(|id| !self.erased.contains_key(id) && universe.is_installable(*id))
            .filter(|id| {
                universe
                    .solvable(*id)
                    .map(|s| !s.is_installed() && s.edition() > installed.edition())
                    .unwrap_or(false)
            })
            .max_by(|a, b| self.compare_candidates(*a, *b));

        match best {
            Some(id) => self.install(index, id, true),
            None => log::debug!("No update for {}", installed),
        }
    }

    /// Higher edition is better, then the lower id.
    fn compare_candidates(&self, a: SolvableId, b: SolvableId) -> std::cmp::Ordering {
        let edition = |id| self.universe.solvable(id).map(|s| s.edition().clone());
        edition(a).cmp(&edition(b)).then_with(|| b.cmp(&a))
    }

    fn install(&mut self, index: usize, root: SolvableId, upgrade: bool) {
        if let Some(&erase_index) = self.erased.get(&root) {
            self.report(ProblemRuleKind::JobRule, root, None, None, vec![
                vec![SolutionElement::Job { index }],
                vec![SolutionElement::Job { index: erase_index }],
            ]);
            return;
        }

        let mut plan = Plan::default();
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            if self.is_present(&plan, id) {
                continue;
            }
            if let Err(problem) = self.check(index, id, upgrade && id == root, &mut plan, &mut queue) {
                log::debug!("Job #{} failed on {}", index, self.universe.describe(id));
                self.problems.push(problem);
                return;
            }
            plan.pending.push(id);
        }

        for id in plan.replacing {
            self.selected.remove(&id);
            self.removed_by.entry(id).or_insert(index);
        }
        for id in plan.pending {
            if self.selected.insert(id) && !self.universe.is_installed(id) {
                self.selected_by.insert(id, index);
            }
        }
    }

    fn is_present(&self, plan: &Plan, id: SolvableId) -> bool {
        (self.selected.contains(&id) && !plan.replacing.contains(&id)) || plan.pending.contains(&id)
    }

    fn present(&self, plan: &Plan) -> Vec<&'a Solvable> {
        let universe = self.universe;
        self.selected
            .iter()
            .filter(|id| !plan.replacing.contains(id))
            .chain(plan.pending.iter())
            .filter_map(|id| universe.solvable(*id))
            .collect()
    }

    /// How a problem caused by `other` could go away besides dropping the job.
    fn blame(&self, other: SolvableId, replacement: Option<SolvableId>) -> Option<SolutionElement> {
        if self.universe.is_installed(other) {
            Some(SolutionElement::Policy {
                from: other,
                to: replacement,
            })
        } else {
            self.selected_by
                .get(&other)
                .map(|&index| SolutionElement::Job { index })
        }
    }

    fn two_sided(
        &self,
        kind: ProblemRuleKind,
        source: SolvableId,
        target: SolvableId,
        dep: Option<Capability>,
        index: usize,
        replacement: Option<SolvableId>,
    ) -> EngineProblem {
        let mut solutions = vec![vec![SolutionElement::Job { index }]];
        let counterpart = if source == target { None } else { Some(target) };
        if let Some(element) = counterpart.and_then(|other| self.blame(other, replacement)) {
            solutions.push(vec![element]);
        }
        EngineProblem {
            rule: ProblemRule {
                kind,
                source,
                target: Some(target),
                dep,
            },
            solutions,
        }
    }

    fn single(&self, kind: ProblemRuleKind, source: SolvableId, dep: Option<Capability>, index: usize) -> EngineProblem {
        EngineProblem {
            rule: ProblemRule {
                kind,
                source,
                target: None,
                dep,
            },
            solutions: vec![vec![SolutionElement::Job { index }]],
        }
    }

    fn check(
        &self,
        index: usize,
        id: SolvableId,
        upgrade: bool,
        plan: &mut Plan,
        queue: &mut VecDeque<SolvableId>,
    ) -> Result<(), EngineProblem> {
        let solvable = match self.universe.solvable(id) {
            Some(solvable) if self.universe.is_installable(id) => solvable,
            _ => return Err(self.single(ProblemRuleKind::NotInstallable, id, None, index)),
        };

        for &other in self.universe.by_name(solvable.kind(), solvable.name()) {
            if other == id || !self.is_present(plan, other) {
                continue;
            }
            let Some(other_solvable) = self.universe.solvable(other) else {
                continue;
            };
            let obsoleted = solvable
                .deps()
                .obsoletes
                .iter()
                .any(|cap| other_solvable.is_obsoleted_by(cap));
            // an identical copy reinstalls the installed one
            let reinstall = other_solvable.edition() == solvable.edition()
                && other_solvable.arch() == solvable.arch();
            if other_solvable.is_installed() && (upgrade || obsoleted || reinstall) {
                plan.replacing.push(other);
                continue;
            }
            return Err(self.two_sided(ProblemRuleKind::SameName, id, other, None, index, Some(id)));
        }

        for cap in &solvable.deps().obsoletes {
            for other in self.present(plan) {
                if other.id() == id || other.name() == solvable.name() || !other.is_obsoleted_by(cap) {
                    continue;
                }
                if other.is_installed() {
                    plan.replacing.push(other.id());
                    continue;
                }
                return Err(self.two_sided(
                    ProblemRuleKind::PackageObsoletes,
                    id,
                    other.id(),
                    Some(cap.clone()),
                    index,
                    None,
                ));
            }
        }

        for other in self.present(plan) {
            if other.id() == id {
                continue;
            }
            if let Some(cap) = solvable.deps().conflicts.iter().find(|cap| other.provides(cap)) {
                return Err(self.two_sided(
                    ProblemRuleKind::PackageConflict,
                    id,
                    other.id(),
                    Some(cap.clone()),
                    index,
                    None,
                ));
            }
            if let Some(cap) = other.deps().conflicts.iter().find(|cap| solvable.provides(cap)) {
                return Err(self.two_sided(
                    ProblemRuleKind::PackageConflict,
                    id,
                    other.id(),
                    Some(cap.clone()),
                    index,
                    None,
                ));
            }
            if other.name() != solvable.name() {
                if let Some(cap) = other.deps().obsoletes.iter().find(|cap| solvable.is_obsoleted_by(cap)) {
                    return Err(self.two_sided(
                        ProblemRuleKind::PackageObsoletes,
                        id,
                        other.id(),
                        Some(cap.clone()),
                        index,
                        None,
                    ));
                }
            }
        }

        let present = self.present(plan);
        for cap in &solvable.deps().requires {
            let satisfied = solvable.provides(cap)
                || present.iter().any(|s| s.provides(cap))
                || queue
                    .iter()
                    .filter_map(|queued| self.universe.solvable(*queued))
                    .any(|s| s.provides(cap));
            if satisfied {
                continue;
            }

            let providers: Vec<SolvableId> = self
                .universe
                .what_provides(cap)
                .into_iter()
                .filter(|p| {
                    !self.erased.contains_key(p)
                        && !self.removed_by.contains_key(p)
                        && !plan.replacing.contains(p)
                })
                .collect();
            if providers.is_empty() {
                return Err(self.single(ProblemRuleKind::NothingProvidesDep, id, Some(cap.clone()), index));
            }

            let best = providers
                .iter()
                .copied()
                .filter(|p| self.universe.is_installable(*p))
                .max_by(|a, b| self.compare_candidates(*a, *b));
            match best {
                Some(provider) => queue.push_back(provider),
                None => {
                    return Err(self.single(
                        ProblemRuleKind::DepProvidersNotInstallable,
                        id,
                        Some(cap.clone()),
                        index,
                    ))
                }
            }
        }

        Ok(())
    }

    fn is_satisfied(&self, cap: &Capability) -> bool {
        self.selected
            .iter()
            .filter_map(|id| self.universe.solvable(*id))
            .any(|s| s.provides(cap))
    }

    /// Installed solvables whose requirements broke because a job removed a
    /// provider. Requirements already broken before the run are ignored.
    fn check_installed_requires(&mut self) {
        let mut reported = HashSet::new();
        loop {
            let broken: Vec<(SolvableId, Capability)> = self
                .universe
                .installed()
                .filter(|s| self.selected.contains(&s.id()) && !reported.contains(&s.id()))
                .filter_map(|s| {
                    s.deps()
                        .requires
                        .iter()
                        .find(|cap| !self.is_satisfied(cap))
                        .map(|cap| (s.id(), cap.clone()))
                })
                .collect();
            if broken.is_empty() {
                break;
            }

            for (dependent, cap) in broken {
                reported.insert(dependent);
                let culprit = self
                    .removed_by
                    .iter()
                    .filter(|(removed, _)| {
                        self.universe
                            .solvable(**removed)
                            .map(|s| s.provides(&cap))
                            .unwrap_or(false)
                    })
                    .map(|(removed, index)| (*removed, *index))
                    .min();

                let Some((removed, index)) = culprit else {
                    log::debug!(
                        "{} already lacks {}",
                        self.universe.describe(dependent),
                        cap
                    );
                    continue;
                };

                if self.flags.allow_uninstall {
                    log::debug!("Uninstalling {} with {}", self.universe.describe(dependent), self.universe.describe(removed));
                    self.selected.remove(&dependent);
                    self.removed_by.entry(dependent).or_insert(index);
                    reported.remove(&dependent);
                } else {
                    self.report(ProblemRuleKind::UpdateRule, dependent, Some(removed), Some(cap), vec![
                        vec![SolutionElement::Job { index }],
                        vec![SolutionElement::Policy {
                            from: dependent,
                            to: None,
                        }],
                    ]);
                }
            }
        }
    }
}

//! End-to-end resolve scenarios.
//!
//! Each test builds a small pool, drives [`SatResolver`] through one or more
//! passes and checks the resulting statuses or problems.

use super::*;
use crate::pool::{PoolItemId, ResPool};
use crate::resolvable::{Arch, Resolvable};
use crate::status::{Causer, ResStatus};

/// Helper to create an x86_64 package
fn pkg(name: &str, edition: &str) -> Resolvable {
    Resolvable::package(name, edition).unwrap().with_arch("x86_64")
}

/// Helper to create a package with requirements
fn pkg_with_requires(name: &str, edition: &str, requires: &[&str]) -> Resolvable {
    requires
        .iter()
        .fold(pkg(name, edition), |r, cap| r.requires(cap).unwrap())
}

fn statuses(resolver: &SatResolver) -> Vec<ResStatus> {
    resolver.pool().items().map(|item| *item.status()).collect()
}

fn status(resolver: &SatResolver, item: PoolItemId) -> ResStatus {
    *resolver.pool().status(item).unwrap()
}

#[test]
fn test_install_with_dependency() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let editor = pool.add_available(pkg_with_requires("editor", "2.0", &["libfoo >= 3"]));
    let libfoo = pool.add_available(pkg("libfoo", "3.1"));
    let unrelated = pool.add_available(pkg("unrelated", "1.0"));
    let installed = pool.add_installed(pkg("base", "1.0"));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(editor);
    resolver.resolve().unwrap();

    for item in [editor, libfoo] {
        let status = status(&resolver, item);
        assert!(status.is_to_be_installed());
        assert!(status.is_by_solver());
    }
    assert!(status(&resolver, unrelated).is_untouched());
    assert!(status(&resolver, installed).is_untouched());
    assert!(resolver.problems().is_empty());
}

#[test]
fn test_missing_dependency_is_one_problem() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let editor = pool.add_available(pkg_with_requires("editor", "2.0", &["libfoo >= 3"]));
    pool.add_available(pkg("libfoo", "2.5"));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(editor);
    let before = statuses(&resolver);

    let err = resolver.resolve().unwrap_err();
    assert!(matches!(err, crate::ResolverError::Unsatisfiable { problems: 1 }));
    assert_eq!(statuses(&resolver), before);

    let problems = resolver.problems();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].kind(), ProblemKind::DependencyUnavailable);
    assert!(problems[0].description().contains("editor-2.0"));
    assert!(problems[0].description().contains("libfoo >= 3"));
    assert!(!problems[0].solutions().is_empty());
}

#[test]
fn test_same_name_conflict_then_apply_solution() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let old = pool.add_installed(pkg("app", "0.9"));
    let new = pool.add_available(pkg("app", "1.0"));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(new);
    assert!(resolver.resolve().is_err());

    let problem = &resolver.problems()[0];
    assert_eq!(problem.kind(), ProblemKind::SameNameConflict);
    let replace = problem
        .solutions()
        .iter()
        .find(|solution| {
            solution.actions().contains(&SingleAction { item: old, action: Action::Remove })
                && solution.actions().contains(&SingleAction { item: new, action: Action::Install })
        })
        .cloned()
        .expect("replacement solution");

    resolver.apply_solutions(&[replace]).unwrap();
    assert!(status(&resolver, old).is_to_be_uninstalled());
    assert!(status(&resolver, new).is_to_be_installed());

    resolver.resolve().unwrap();
    assert!(resolver.problems().is_empty());
    let old_status = status(&resolver, old);
    assert!(old_status.is_to_be_uninstalled_due_to_upgrade());
    assert!(old_status.is_to_be_uninstalled());
    assert!(status(&resolver, new).is_to_be_installed());
}

#[test]
fn test_do_not_install_solution() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let editor = pool.add_available(pkg_with_requires("editor", "2.0", &["libfoo >= 3"]));
    let tool = pool.add_available(pkg("tool", "1.0"));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(editor).add_to_install(tool);
    assert!(resolver.resolve().is_err());

    let keep = resolver.problems()[0].solutions()[0].clone();
    assert_eq!(keep.actions(), &[SingleAction { item: editor, action: Action::Keep }]);
    resolver.apply_solutions(&[keep]).unwrap();
    assert!(!resolver.requests().to_install().contains(&editor));

    resolver.resolve().unwrap();
    assert!(status(&resolver, editor).is_untouched());
    assert!(status(&resolver, tool).is_to_be_installed());
}

#[test]
fn test_resolve_is_idempotent() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let editor = pool.add_available(pkg_with_requires("editor", "2.0", &["libfoo"]));
    pool.add_available(pkg("libfoo", "3.0"));
    let gone = pool.add_installed(pkg("gone", "1.0"));
    let user_pick = pool.add_available(pkg("extra", "1.0"));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(editor).add_to_remove(gone);
    resolver
        .pool_mut()
        .item_mut(user_pick)
        .unwrap()
        .status_mut()
        .set_to_be_installed(Causer::User);

    let mut lists = resolver.requests().clone();
    collect_transactions(resolver.pool(), &mut lists);
    let first_job = build_job(resolver.pool(), &lists);
    resolver.resolve().unwrap();
    let first = statuses(&resolver);

    let mut lists = resolver.requests().clone();
    collect_transactions(resolver.pool(), &mut lists);
    let second_job = build_job(resolver.pool(), &lists);
    resolver.resolve().unwrap();

    assert_eq!(first_job, second_job);
    assert_eq!(statuses(&resolver), first);
    assert!(status(&resolver, user_pick).is_by_user());
    assert!(status(&resolver, gone).is_to_be_uninstalled());
}

#[test]
fn test_stale_solver_choice_is_revisited() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let editor = pool.add_available(pkg_with_requires("editor", "2.0", &["libfoo"]));
    let libfoo = pool.add_available(pkg("libfoo", "3.0"));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(editor);
    resolver.resolve().unwrap();
    assert!(status(&resolver, libfoo).is_to_be_installed());

    // dropping the request clears the dependency picked for it
    let mut keep = ProblemSolution::new();
    keep.add_action(editor, Action::Keep);
    resolver.apply_solutions(&[keep]).unwrap();
    resolver.resolve().unwrap();

    assert!(status(&resolver, editor).is_untouched());
    let libfoo_status = status(&resolver, libfoo);
    assert!(libfoo_status.is_untouched());
    assert!(libfoo_status.is_by_appl_low());
}

#[test]
fn test_failed_pass_keeps_previous_decisions() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let editor = pool.add_available(pkg_with_requires("editor", "2.0", &["libfoo"]));
    let libfoo = pool.add_available(pkg("libfoo", "3.0"));
    let broken = pool.add_available(pkg_with_requires("broken", "1.0", &["missing"]));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(editor);
    resolver.resolve().unwrap();
    let before = statuses(&resolver);

    resolver.add_to_install(broken);
    assert!(resolver.resolve().is_err());
    assert_eq!(statuses(&resolver), before);
    assert!(status(&resolver, libfoo).is_to_be_installed());
    assert_eq!(resolver.problems().len(), 1);
}

#[test]
fn test_remove_with_dependent_offers_removal() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let lib = pool.add_installed(pkg("libfoo", "3.0"));
    let editor = pool.add_installed(pkg_with_requires("editor", "2.0", &["libfoo"]));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_remove(lib);
    assert!(resolver.resolve().is_err());

    let problem = &resolver.problems()[0];
    assert_eq!(problem.kind(), ProblemKind::UpdateRuleConflict);
    // dropping an ERASE_SOLVABLE_NAME job has no concrete action
    assert!(problem.solutions()[0].is_degraded());

    let remove_dependent = problem.solutions()[1].clone();
    assert_eq!(remove_dependent.actions(), &[SingleAction { item: editor, action: Action::Remove }]);
    resolver.apply_solutions(&[remove_dependent]).unwrap();
    resolver.resolve().unwrap();

    assert!(status(&resolver, lib).is_to_be_uninstalled());
    assert!(status(&resolver, editor).is_to_be_uninstalled());
}

#[test]
fn test_incomplete_item_is_reinstalled() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let broken = pool.add_installed(pkg("libfoo", "3.0"));
    let candidate = pool.add_available(pkg("libfoo", "3.0"));
    pool.item_mut(broken).unwrap().status_mut().set_incomplete(Causer::User);

    let mut lists = RequestLists::new();
    collect_transactions(&pool, &mut lists);
    assert_eq!(lists.to_install().iter().copied().collect::<Vec<_>>(), vec![candidate]);
}

#[test]
fn test_resolve_reinstalls_incomplete_item() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let broken = pool.add_installed(pkg("libfoo", "3.0"));
    let candidate = pool.add_available(pkg("libfoo", "3.0"));
    let editor = pool.add_installed(pkg_with_requires("editor", "2.0", &["libfoo"]));
    pool.item_mut(broken).unwrap().status_mut().set_incomplete(Causer::User);

    let mut resolver = SatResolver::new(pool);
    resolver.resolve().unwrap();

    assert!(resolver.problems().is_empty());
    assert!(status(&resolver, candidate).is_to_be_installed());
    let broken = status(&resolver, broken);
    assert!(broken.is_to_be_uninstalled_due_to_upgrade());
    assert!(broken.is_by_user());
    assert!(status(&resolver, editor).is_untouched());
}

#[test]
fn test_resolve_with_policy_picks_solutions() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let old = pool.add_installed(pkg("app", "0.9"));
    let new = pool.add_available(pkg("app", "1.0"));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(new);
    let mut seen = Vec::new();
    resolver
        .resolve_with_policy(|problem| {
            seen.push(problem.kind());
            Some(problem.solutions().len() - 1)
        })
        .unwrap();

    assert_eq!(seen, vec![ProblemKind::SameNameConflict]);
    assert!(status(&resolver, old).is_to_be_uninstalled());
    assert!(status(&resolver, new).is_to_be_installed());
}

#[test]
fn test_resolve_with_policy_gives_up() {
    let mut pool = ResPool::new(Arch::new("x86_64"));
    let editor = pool.add_available(pkg_with_requires("editor", "2.0", &["libfoo"]));

    let mut resolver = SatResolver::new(pool);
    resolver.add_to_install(editor);
    let err = resolver.resolve_with_policy(|_| None).unwrap_err();

    assert!(matches!(err, crate::ResolverError::Unsatisfiable { .. }));
    assert_eq!(resolver.problems().len(), 1);
}

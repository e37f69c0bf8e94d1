use std::collections::HashSet;

use super::engine::SolverHandle;
use super::session::SolverSession;
use crate::pool::{PoolItemId, ResPool};
use crate::status::{Causer, TransactState};

/// Items already written back during one resolve pass.
///
/// Created fresh for every pass and dropped with it.
#[derive(Debug, Default)]
pub struct AppliedSet {
    items: HashSet<PoolItemId>,
}

impl AppliedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `item`; false if it was already recorded.
    pub fn insert(&mut self, item: PoolItemId) -> bool {
        self.items.insert(item)
    }

    pub fn contains(&self, item: PoolItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Set `item` to `state`, clearing its previous state first.
///
/// Any state set by a higher-priority causer keeps that causer, so solver
/// write-back never demotes a user request or a user-marked incomplete item.
pub fn write_back(pool: &mut ResPool, item: PoolItemId, state: TransactState, causer: Causer) -> bool {
    let Some(pool_item) = pool.item_mut(item) else {
        log::error!("Pool item #{} does not exist", item);
        return false;
    };

    let status = pool_item.status_mut();
    let causer = if status.is_untouched() { causer } else { causer.max(status.causer()) };
    let accepted = match state {
        TransactState::Untouched => status.reset_transact(causer),
        state => status.set_transact(state, causer),
    };

    if accepted {
        log::debug!("{}: {}", pool_item, pool_item.status());
    } else {
        log::warn!("{}: cannot set {} ({})", pool_item, state.as_str(), pool_item.status());
    }
    accepted
}

/// Write a successful decision set back into the pool.
///
/// Installed candidates left out become `toBeUninstalled` (or
/// `toBeUninstalledDueToUpgrade` when a selected candidate of the same name
/// and kind replaces them); selected candidates not installed become
/// `toBeInstalled`. Each item is written at most once per `applied` set.
/// Returns the number of items written.
pub fn apply_decisions<H: SolverHandle>(
    pool: &mut ResPool,
    session: &SolverSession<H>,
    applied: &mut AppliedSet,
) -> usize {
    let decisions = session.decisions();
    let mut changes = Vec::new();
    {
        let universe = pool.universe();
        for (id, selected) in decisions.iter() {
            let installed = universe.is_installed(id);
            let state = match (installed, selected) {
                (true, false) => {
                    let replaced = universe.solvable(id).map(|solvable| {
                        universe
                            .by_name(solvable.kind(), solvable.name())
                            .iter()
                            .any(|other| *other != id && !universe.is_installed(*other) && decisions.is_selected(*other))
                    });
                    if replaced == Some(true) {
                        TransactState::ToBeUninstalledDueToUpgrade
                    } else {
                        TransactState::ToBeUninstalled
                    }
                }
                (false, true) => TransactState::ToBeInstalled,
                _ => continue,
            };
            changes.push((id, state));
        }
    }

    let mut written = 0;
    for (id, state) in changes {
        let Some(item) = pool.find(id) else {
            log::error!("No pool item for {}", pool.universe().describe(id));
            continue;
        };
        if !applied.insert(item) {
            log::debug!("Already applied {} in this pass", pool.universe().describe(id));
            continue;
        }
        if write_back(pool, item, state, Causer::Solver) {
            written += 1;
        }
    }
    written
}

use indexmap::IndexSet;

use crate::pool::{PoolItemId, ResPool};
use crate::status::Causer;

/// Deduplicated, insertion-ordered request lists.
///
/// An item is never in both `to_install` and `to_remove`: adding it to one
/// withdraws a pending entry in the other instead of recording a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLists {
    to_install: IndexSet<PoolItemId>,
    to_remove: IndexSet<PoolItemId>,
    to_lock_uninstalled: IndexSet<PoolItemId>,
    to_keep: IndexSet<PoolItemId>,
}

impl RequestLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request an install, withdrawing a pending removal of `item`
    pub fn add_to_install(&mut self, item: PoolItemId) -> &mut Self {
        if !self.to_remove.shift_remove(&item) {
            self.to_install.insert(item);
        }
        self
    }

    /// Request a removal, withdrawing a pending install of `item`
    pub fn add_to_remove(&mut self, item: PoolItemId) -> &mut Self {
        if !self.to_install.shift_remove(&item) {
            self.to_remove.insert(item);
        }
        self
    }

    /// Keep an uninstalled item out of the solution
    pub fn add_to_lock_uninstalled(&mut self, item: PoolItemId) -> &mut Self {
        self.to_lock_uninstalled.insert(item);
        self
    }

    /// Keep an installed item
    pub fn add_to_keep(&mut self, item: PoolItemId) -> &mut Self {
        self.to_keep.insert(item);
        self
    }

    /// Drop every request naming `item`.
    pub fn forget(&mut self, item: PoolItemId) {
        self.to_install.shift_remove(&item);
        self.to_remove.shift_remove(&item);
        self.to_lock_uninstalled.shift_remove(&item);
        self.to_keep.shift_remove(&item);
    }

    /// Drop all requests
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Items to install, in request order
    pub fn to_install(&self) -> &IndexSet<PoolItemId> {
        &self.to_install
    }

    /// Items to remove, in request order
    pub fn to_remove(&self) -> &IndexSet<PoolItemId> {
        &self.to_remove
    }

    /// Uninstalled items locked out of the solution
    pub fn to_lock_uninstalled(&self) -> &IndexSet<PoolItemId> {
        &self.to_lock_uninstalled
    }

    /// Installed items to keep
    pub fn to_keep(&self) -> &IndexSet<PoolItemId> {
        &self.to_keep
    }

    /// Whether no list holds a request
    pub fn is_empty(&self) -> bool {
        self.to_install.is_empty()
            && self.to_remove.is_empty()
            && self.to_lock_uninstalled.is_empty()
            && self.to_keep.is_empty()
    }
}

/// Items whose solver-made state must be cleared once the pass succeeds.
#[derive(Debug, Default)]
pub struct StaleTransactions {
    items: Vec<PoolItemId>,
}

impl StaleTransactions {
    /// Items to reset
    pub fn items(&self) -> &[PoolItemId] {
        &self.items
    }

    /// Reset every stale item to untouched, attributed to `APPL_LOW`.
    pub fn reset(self, pool: &mut ResPool) {
        for id in self.items {
            if let Some(item) = pool.item_mut(id) {
                log::debug!("Resetting {}", item);
                item.status_mut().reset_transact(Causer::ApplLow);
            }
        }
    }
}

/// Scan every pool item once and turn pending transactions into requests.
///
/// Items last touched by the solver or low-priority policy are never
/// re-queued; they are returned so the caller can reset them when the pass
/// succeeds, leaving the pool untouched by an unsatisfiable pass.
pub fn collect_transactions(pool: &ResPool, lists: &mut RequestLists) -> StaleTransactions {
    let mut stale = StaleTransactions::default();

    for item in pool.items() {
        let status = item.status();
        let by_solver = status.is_by_solver() || status.is_by_appl_low();

        if by_solver {
            if !status.is_untouched() {
                stale.items.push(item.id());
            }
            continue;
        }

        if status.is_to_be_installed() {
            lists.add_to_install(item.id());
        }
        if status.is_to_be_uninstalled() {
            lists.add_to_remove(item.id());
        }
        if status.is_incomplete() {
            match pool.find_reinstall_item(item.id()) {
                Some(reinstall) => {
                    log::info!(
                        "Reinstall {} for incomplete {}",
                        pool.item(reinstall).map(|r| r.to_string()).unwrap_or_default(),
                        item
                    );
                    lists.add_to_install(reinstall);
                }
                None => log::warn!("Can't find {} for re-installation", item),
            }
        }
        if status.is_locked() && status.is_uninstalled() {
            // a former solver run may have selected it
            lists.add_to_lock_uninstalled(item.id());
        }
        if status.is_kept() {
            lists.add_to_keep(item.id());
        }
    }

    stale
}

//! The package pool: every resolvable with its transaction status, plus the
//! solver universe built alongside it.

mod universe;
mod vendor;

pub use universe::{Solvable, SolvableId, Universe};
pub use vendor::VendorClasses;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::resolvable::{Arch, Resolvable};
use crate::status::ResStatus;

/// Index of an item in its pool.
pub type PoolItemId = usize;

/// Source priority given to available items unless stated otherwise. Lower wins.
pub const DEFAULT_PRIORITY: i32 = 99;

/// A resolvable plus its mutable transaction status.
#[derive(Debug, Clone)]
pub struct PoolItem {
    id: PoolItemId,
    resolvable: Arc<Resolvable>,
    status: ResStatus,
    solvable: Option<SolvableId>,
    priority: i32,
}

impl PoolItem {
    pub fn id(&self) -> PoolItemId {
        self.id
    }

    pub fn resolvable(&self) -> &Arc<Resolvable> {
        &self.resolvable
    }

    pub fn status(&self) -> &ResStatus {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut ResStatus {
        &mut self.status
    }

    /// Identity in the solver universe, if the item has one.
    pub fn solvable(&self) -> Option<SolvableId> {
        self.solvable
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }
}

impl fmt::Display for PoolItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolvable)
    }
}

/// Owner of all pool items.
#[derive(Debug, Clone)]
pub struct ResPool {
    items: Vec<PoolItem>,
    universe: Universe,
    by_solvable: HashMap<SolvableId, PoolItemId>,
}

impl ResPool {
    pub fn new(system_arch: Arch) -> Self {
        Self::with_universe(Universe::new(system_arch, VendorClasses::default()))
    }

    pub fn with_config(config: &ResolverConfig) -> Self {
        Self::with_universe(Universe::new(
            config.arch(),
            VendorClasses::new(&config.vendor_classes),
        ))
    }

    fn with_universe(universe: Universe) -> Self {
        Self {
            items: Vec::new(),
            universe,
            by_solvable: HashMap::new(),
        }
    }

    /// Add an installed item to the pool and the installed base.
    pub fn add_installed(&mut self, resolvable: Resolvable) -> PoolItemId {
        self.insert(resolvable, true, DEFAULT_PRIORITY, true)
    }

    /// Add an available (not installed) item.
    pub fn add_available(&mut self, resolvable: Resolvable) -> PoolItemId {
        self.insert(resolvable, false, DEFAULT_PRIORITY, true)
    }

    pub fn add_available_with_priority(&mut self, resolvable: Resolvable, priority: i32) -> PoolItemId {
        self.insert(resolvable, false, priority, true)
    }

    /// Add an item the solver universe does not know about.
    pub fn add_unindexed(&mut self, resolvable: Resolvable, installed: bool) -> PoolItemId {
        self.insert(resolvable, installed, DEFAULT_PRIORITY, false)
    }

    fn insert(&mut self, resolvable: Resolvable, installed: bool, priority: i32, indexed: bool) -> PoolItemId {
        let id = self.items.len();
        let resolvable = Arc::new(resolvable);
        let solvable = indexed.then(|| self.universe.add(Arc::clone(&resolvable), installed));
        if let Some(solvable) = solvable {
            self.by_solvable.insert(solvable, id);
        }

        self.items.push(PoolItem {
            id,
            resolvable,
            status: if installed { ResStatus::installed() } else { ResStatus::uninstalled() },
            solvable,
            priority,
        });
        id
    }

    pub fn item(&self, id: PoolItemId) -> Option<&PoolItem> {
        self.items.get(id)
    }

    pub fn item_mut(&mut self, id: PoolItemId) -> Option<&mut PoolItem> {
        self.items.get_mut(id)
    }

    pub fn items(&self) -> impl Iterator<Item = &PoolItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn status(&self, id: PoolItemId) -> Option<&ResStatus> {
        self.item(id).map(PoolItem::status)
    }

    /// Pool item for a solvable.
    pub fn find(&self, solvable: SolvableId) -> Option<PoolItemId> {
        self.by_solvable.get(&solvable).copied()
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Find the available item to reinstall in place of `item`.
    ///
    /// Candidates share name and kind and are not installed. An identical
    /// edition and arch wins, then the better source priority, then the
    /// higher edition.
    pub fn find_reinstall_item(&self, item: PoolItemId) -> Option<PoolItemId> {
        let target = self.item(item)?.resolvable();

        self.items
            .iter()
            .filter(|candidate| candidate.id != item)
            .filter(|candidate| candidate.status.is_uninstalled())
            .filter(|candidate| candidate.resolvable.same_identity(target))
            .min_by(|a, b| {
                let exact = |c: &PoolItem| {
                    c.resolvable.edition() == target.edition() && c.resolvable.arch() == target.arch()
                };
                exact(b)
                    .cmp(&exact(a))
                    .then_with(|| a.priority.cmp(&b.priority))
                    .then_with(|| b.resolvable.edition().cmp(a.resolvable.edition()))
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map(|candidate| candidate.id)
    }
}

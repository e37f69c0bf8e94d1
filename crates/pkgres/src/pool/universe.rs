use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use pkgres_evr::{Capability, Edition, Rel};

use super::vendor::VendorClasses;
use crate::resolvable::{Arch, Dependencies, ResKind, Resolvable};

/// Identity of a solvable inside the universe. 1-based; 0 never names a solvable.
pub type SolvableId = u32;

/// A resolvable as the satisfiability engine sees it.
#[derive(Debug, Clone)]
pub struct Solvable {
    id: SolvableId,
    installed: bool,
    resolvable: Arc<Resolvable>,
    /// Implicit `name = edition` provide
    self_provide: Capability,
}

impl Solvable {
    pub fn id(&self) -> SolvableId {
        self.id
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }

    pub fn resolvable(&self) -> &Arc<Resolvable> {
        &self.resolvable
    }

    pub fn name(&self) -> &str {
        self.resolvable.name()
    }

    pub fn kind(&self) -> ResKind {
        self.resolvable.kind()
    }

    pub fn edition(&self) -> &Edition {
        self.resolvable.edition()
    }

    pub fn arch(&self) -> &Arch {
        self.resolvable.arch()
    }

    pub fn vendor(&self) -> &str {
        self.resolvable.vendor()
    }

    pub fn deps(&self) -> &Dependencies {
        self.resolvable.deps()
    }

    /// Whether this solvable provides something matching `cap`.
    pub fn provides(&self, cap: &Capability) -> bool {
        cap.is_satisfied_by(&self.self_provide)
            || self.deps().provides.iter().any(|p| cap.is_satisfied_by(p))
    }

    /// Obsoletes match the solvable itself, never its provides.
    pub fn is_obsoleted_by(&self, cap: &Capability) -> bool {
        cap.matches(self.name(), self.edition())
    }
}

impl fmt::Display for Solvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resolvable)
    }
}

/// The package universe handed to the satisfiability engine: every known
/// solvable, with the installed ones forming the installed base.
#[derive(Debug, Clone)]
pub struct Universe {
    solvables: Vec<Solvable>,
    by_name: HashMap<(ResKind, String), Vec<SolvableId>>,
    system_arch: Arch,
    vendor_classes: VendorClasses,
}

impl Universe {
    pub fn new(system_arch: Arch, vendor_classes: VendorClasses) -> Self {
        Self {
            solvables: Vec::new(),
            by_name: HashMap::new(),
            system_arch,
            vendor_classes,
        }
    }

    pub(crate) fn add(&mut self, resolvable: Arc<Resolvable>, installed: bool) -> SolvableId {
        let id = (self.solvables.len() + 1) as SolvableId;
        let self_provide = Capability::versioned(
            resolvable.name(),
            Rel::Equal,
            resolvable.edition().clone(),
        );
        self.by_name
            .entry((resolvable.kind(), resolvable.name().to_string()))
            .or_default()
            .push(id);
        self.solvables.push(Solvable {
            id,
            installed,
            resolvable,
            self_provide,
        });
        id
    }

    pub fn solvable(&self, id: SolvableId) -> Option<&Solvable> {
        if id == 0 {
            return None;
        }
        self.solvables.get(id as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.solvables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solvables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Solvable> {
        self.solvables.iter()
    }

    /// The installed base
    pub fn installed(&self) -> impl Iterator<Item = &Solvable> {
        self.solvables.iter().filter(|s| s.installed)
    }

    pub fn is_installed(&self, id: SolvableId) -> bool {
        self.solvable(id).map(|s| s.installed).unwrap_or(false)
    }

    /// All solvables sharing kind and name.
    pub fn by_name(&self, kind: ResKind, name: &str) -> &[SolvableId] {
        self.by_name
            .get(&(kind, name.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Solvables providing `cap`, in id order.
    pub fn what_provides(&self, cap: &Capability) -> Vec<SolvableId> {
        self.solvables
            .iter()
            .filter(|s| s.provides(cap))
            .map(|s| s.id)
            .collect()
    }

    pub fn is_installable(&self, id: SolvableId) -> bool {
        self.solvable(id)
            .map(|s| s.arch().compatible_with(&self.system_arch))
            .unwrap_or(false)
    }

    pub fn system_arch(&self) -> &Arch {
        &self.system_arch
    }

    pub fn vendor_classes(&self) -> &VendorClasses {
        &self.vendor_classes
    }

    /// `name-edition.arch`, or a placeholder for unknown ids.
    pub fn describe(&self, id: SolvableId) -> String {
        self.solvable(id)
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("<solvable #{}>", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> Universe {
        let mut universe = Universe::new(Arch::new("x86_64"), VendorClasses::default());
        universe.add(
            Arc::new(Resolvable::package("libfoo", "3.1").unwrap().with_arch("x86_64")),
            true,
        );
        universe.add(
            Arc::new(
                Resolvable::package("mta-postfix", "1.0")
                    .unwrap()
                    .provides("smtp_daemon")
                    .unwrap(),
            ),
            false,
        );
        universe.add(
            Arc::new(Resolvable::package("libfoo", "4.0").unwrap().with_arch("aarch64")),
            false,
        );
        universe
    }

    #[test]
    fn test_ids_are_one_based() {
        let universe = universe();
        assert!(universe.solvable(0).is_none());
        assert_eq!(universe.solvable(1).unwrap().name(), "libfoo");
        assert!(universe.solvable(4).is_none());
        assert_eq!(universe.len(), 3);
    }

    #[test]
    fn test_what_provides() {
        let universe = universe();
        assert_eq!(universe.what_provides(&Capability::parse("libfoo >= 3").unwrap()), vec![1, 3]);
        assert_eq!(universe.what_provides(&Capability::parse("libfoo > 3.5").unwrap()), vec![3]);
        assert_eq!(universe.what_provides(&Capability::named("smtp_daemon")), vec![2]);
        assert!(universe.what_provides(&Capability::named("libbar")).is_empty());
    }

    #[test]
    fn test_installed_base_and_installability() {
        let universe = universe();
        let installed: Vec<_> = universe.installed().map(|s| s.id()).collect();
        assert_eq!(installed, vec![1]);
        assert!(universe.is_installable(1));
        assert!(universe.is_installable(2)); // noarch
        assert!(!universe.is_installable(3));
        assert_eq!(universe.by_name(ResKind::Package, "libfoo"), &[1, 3]);
        assert!(universe.by_name(ResKind::Pattern, "libfoo").is_empty());
    }
}

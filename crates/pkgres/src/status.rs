//! Per-item transaction status with causer attribution.

use std::fmt;

/// Who last changed an item's transaction state. Ordered by priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Causer {
    Solver,
    ApplLow,
    User,
}

impl Causer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Causer::Solver => "solver",
            Causer::ApplLow => "appl-low",
            Causer::User => "user",
        }
    }
}

/// Mutually exclusive transaction states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransactState {
    #[default]
    Untouched,
    ToBeInstalled,
    ToBeUninstalled,
    ToBeUninstalledDueToUpgrade,
    Incomplete,
    Unneeded,
    Satisfied,
}

impl TransactState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactState::Untouched => "untouched",
            TransactState::ToBeInstalled => "toBeInstalled",
            TransactState::ToBeUninstalled => "toBeUninstalled",
            TransactState::ToBeUninstalledDueToUpgrade => "toBeUninstalledDueToUpgrade",
            TransactState::Incomplete => "incomplete",
            TransactState::Unneeded => "unneeded",
            TransactState::Satisfied => "satisfied",
        }
    }
}

/// Status of a pool item.
///
/// The core state is exclusive, `locked` and `kept` are independent flags and
/// `causer` records who made the last change. Every setter returns whether the
/// transition was accepted:
/// - a locked item rejects any state change until it is unlocked;
/// - a causer cannot clear or replace a pending state owned by a
///   higher-priority causer;
/// - `ToBeInstalled` needs an uninstalled item, `ToBeUninstalled*` an installed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResStatus {
    installed: bool,
    state: TransactState,
    locked: bool,
    kept: bool,
    causer: Causer,
}

impl ResStatus {
    /// Untouched status of an installed item
    pub fn installed() -> Self {
        Self::new(true)
    }

    /// Untouched status of an available item
    pub fn uninstalled() -> Self {
        Self::new(false)
    }

    fn new(installed: bool) -> Self {
        Self {
            installed,
            state: TransactState::Untouched,
            locked: false,
            kept: false,
            causer: Causer::Solver,
        }
    }

    /// Whether the item is on the system
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// Whether the item is only available
    pub fn is_uninstalled(&self) -> bool {
        !self.installed
    }

    /// Current transaction state
    pub fn state(&self) -> TransactState {
        self.state
    }

    /// Who made the last change
    pub fn causer(&self) -> Causer {
        self.causer
    }

    /// No pending or established state
    pub fn is_untouched(&self) -> bool {
        self.state == TransactState::Untouched
    }

    /// Pending install
    pub fn is_to_be_installed(&self) -> bool {
        self.state == TransactState::ToBeInstalled
    }

    /// True for both plain and upgrade-driven removal.
    pub fn is_to_be_uninstalled(&self) -> bool {
        matches!(
            self.state,
            TransactState::ToBeUninstalled | TransactState::ToBeUninstalledDueToUpgrade
        )
    }

    /// Removal because a newer item replaces this one
    pub fn is_to_be_uninstalled_due_to_upgrade(&self) -> bool {
        self.state == TransactState::ToBeUninstalledDueToUpgrade
    }

    /// Installed but broken, needs a reinstall
    pub fn is_incomplete(&self) -> bool {
        self.state == TransactState::Incomplete
    }

    /// Not needed on this system
    pub fn is_unneeded(&self) -> bool {
        self.state == TransactState::Unneeded
    }

    /// Already satisfied by the system
    pub fn is_satisfied(&self) -> bool {
        self.state == TransactState::Satisfied
    }

    /// Pending install or removal
    pub fn transacts(&self) -> bool {
        self.is_to_be_installed() || self.is_to_be_uninstalled()
    }

    /// Whether state changes are rejected
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the item must stay installed
    pub fn is_kept(&self) -> bool {
        self.kept
    }

    /// Last changed by the solver
    pub fn is_by_solver(&self) -> bool {
        self.causer == Causer::Solver
    }

    /// Last changed by low-priority application policy
    pub fn is_by_appl_low(&self) -> bool {
        self.causer == Causer::ApplLow
    }

    /// Last changed by the user
    pub fn is_by_user(&self) -> bool {
        self.causer == Causer::User
    }

    /// Clear the transaction state back to untouched.
    pub fn reset_transact(&mut self, causer: Causer) -> bool {
        if self.state == TransactState::Untouched {
            self.causer = causer;
            return true;
        }
        if self.locked || self.causer > causer {
            return false;
        }
        self.state = TransactState::Untouched;
        self.causer = causer;
        true
    }

    /// Move to `target`, first clearing the previous state under `causer`.
    pub fn set_transact(&mut self, target: TransactState, causer: Causer) -> bool {
        if self.state == target {
            if causer > self.causer {
                self.causer = causer;
            }
            return true;
        }
        if self.locked {
            return false;
        }

        let valid = match target {
            TransactState::ToBeInstalled => self.is_uninstalled(),
            TransactState::ToBeUninstalled | TransactState::ToBeUninstalledDueToUpgrade => {
                self.is_installed()
            }
            _ => true,
        };
        if !valid || !self.reset_transact(causer) {
            return false;
        }

        self.state = target;
        true
    }

    pub fn set_to_be_installed(&mut self, causer: Causer) -> bool {
        self.set_transact(TransactState::ToBeInstalled, causer)
    }

    pub fn set_to_be_uninstalled(&mut self, causer: Causer) -> bool {
        self.set_transact(TransactState::ToBeUninstalled, causer)
    }

    pub fn set_to_be_uninstalled_due_to_upgrade(&mut self, causer: Causer) -> bool {
        self.set_transact(TransactState::ToBeUninstalledDueToUpgrade, causer)
    }

    pub fn set_incomplete(&mut self, causer: Causer) -> bool {
        self.set_transact(TransactState::Incomplete, causer)
    }

    pub fn set_unneeded(&mut self, causer: Causer) -> bool {
        self.set_transact(TransactState::Unneeded, causer)
    }

    pub fn set_satisfied(&mut self, causer: Causer) -> bool {
        self.set_transact(TransactState::Satisfied, causer)
    }

    /// Lock or unlock. Locking drops a pending transaction the causer may clear.
    pub fn set_lock(&mut self, locked: bool, causer: Causer) -> bool {
        if self.locked == locked {
            return true;
        }
        if self.causer > causer && (self.locked || self.transacts()) {
            return false;
        }
        if locked {
            self.state = TransactState::Untouched;
        }
        self.locked = locked;
        self.causer = causer;
        true
    }

    /// Keep (or stop keeping) the current installed state.
    pub fn set_kept(&mut self, kept: bool, causer: Causer) -> bool {
        if self.kept == kept {
            return true;
        }
        if kept && self.transacts() && !self.reset_transact(causer) {
            return false;
        }
        if !kept && self.causer > causer {
            return false;
        }
        self.kept = kept;
        self.causer = causer;
        true
    }
}

impl fmt::Display for ResStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}({})",
            if self.installed { "installed" } else { "uninstalled" },
            self.state.as_str(),
            self.causer.as_str()
        )?;
        if self.locked {
            write!(f, " locked")?;
        }
        if self.kept {
            write!(f, " kept")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_needs_uninstalled() {
        let mut status = ResStatus::installed();
        assert!(!status.set_to_be_installed(Causer::User));
        assert!(status.is_untouched());

        let mut status = ResStatus::uninstalled();
        assert!(status.set_to_be_installed(Causer::User));
        assert!(status.is_to_be_installed());
        assert!(status.is_by_user());
        assert!(!status.set_to_be_uninstalled(Causer::User));
    }

    #[test]
    fn test_states_are_exclusive() {
        let mut status = ResStatus::installed();
        assert!(status.set_to_be_uninstalled(Causer::User));
        assert!(status.set_to_be_uninstalled_due_to_upgrade(Causer::User));
        assert!(status.is_to_be_uninstalled());
        assert!(status.is_to_be_uninstalled_due_to_upgrade());
        assert!(!status.is_to_be_installed());
        assert!(status.set_incomplete(Causer::User));
        assert!(!status.transacts());
    }

    #[test]
    fn test_lower_causer_cannot_override() {
        let mut status = ResStatus::uninstalled();
        assert!(status.set_to_be_installed(Causer::User));
        assert!(!status.reset_transact(Causer::Solver));
        assert!(!status.reset_transact(Causer::ApplLow));
        assert!(status.is_to_be_installed());

        // same state keeps the higher attribution
        assert!(status.set_to_be_installed(Causer::Solver));
        assert!(status.is_by_user());

        assert!(status.reset_transact(Causer::User));
        assert!(status.is_untouched());
    }

    #[test]
    fn test_higher_causer_takes_over() {
        let mut status = ResStatus::installed();
        assert!(status.set_to_be_uninstalled(Causer::Solver));
        assert!(status.reset_transact(Causer::ApplLow));
        assert!(status.is_untouched());
        assert!(status.is_by_appl_low());
    }

    #[test]
    fn test_lock_rejects_changes() {
        let mut status = ResStatus::uninstalled();
        assert!(status.set_lock(true, Causer::User));
        assert!(!status.set_to_be_installed(Causer::User));
        assert!(status.set_lock(false, Causer::User));
        assert!(status.set_to_be_installed(Causer::User));
    }

    #[test]
    fn test_lock_drops_lower_transaction() {
        let mut status = ResStatus::uninstalled();
        assert!(status.set_to_be_installed(Causer::Solver));
        assert!(status.set_lock(true, Causer::User));
        assert!(status.is_untouched());
        assert!(status.is_locked());
        assert!(!status.set_lock(false, Causer::Solver));
    }

    #[test]
    fn test_keep_clears_pending() {
        let mut status = ResStatus::installed();
        assert!(status.set_to_be_uninstalled(Causer::ApplLow));
        assert!(status.set_kept(true, Causer::User));
        assert!(status.is_kept());
        assert!(status.is_untouched());
    }

    #[test]
    fn test_display() {
        let mut status = ResStatus::uninstalled();
        status.set_to_be_installed(Causer::Solver);
        assert_eq!(status.to_string(), "uninstalled toBeInstalled(solver)");
    }
}

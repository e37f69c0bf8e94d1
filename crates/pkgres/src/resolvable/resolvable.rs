use std::fmt;

use pkgres_evr::{Capability, Edition};

use super::arch::Arch;
use super::kind::ResKind;
use crate::error::Result;

/// Dependency lists of a resolvable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub requires: Vec<Capability>,
    pub provides: Vec<Capability>,
    pub conflicts: Vec<Capability>,
    pub obsoletes: Vec<Capability>,
}

/// Data only some kinds carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindDetails {
    Package {
        summary: String,
        install_size: u64,
    },
    Patch {
        category: String,
        reboot_needed: bool,
    },
    Atom,
    Pattern {
        summary: String,
        category: String,
        visible: bool,
        order: String,
    },
    Selection {
        summary: String,
        description: String,
        category: String,
        visible: bool,
        order: String,
    },
    Script {
        do_script: String,
        undo_script: Option<String>,
    },
    Message {
        text: String,
    },
    Product {
        short_name: String,
        distribution: String,
    },
    Language {
        locale: String,
    },
}

impl KindDetails {
    /// Empty details for a kind.
    pub fn empty(kind: ResKind) -> Self {
        match kind {
            ResKind::Package => KindDetails::Package {
                summary: String::new(),
                install_size: 0,
            },
            ResKind::Patch => KindDetails::Patch {
                category: String::new(),
                reboot_needed: false,
            },
            ResKind::Atom => KindDetails::Atom,
            ResKind::Pattern => KindDetails::Pattern {
                summary: String::new(),
                category: String::new(),
                visible: true,
                order: String::new(),
            },
            ResKind::Selection => KindDetails::Selection {
                summary: String::new(),
                description: String::new(),
                category: String::new(),
                visible: true,
                order: String::new(),
            },
            ResKind::Script => KindDetails::Script {
                do_script: String::new(),
                undo_script: None,
            },
            ResKind::Message => KindDetails::Message { text: String::new() },
            ResKind::Product => KindDetails::Product {
                short_name: String::new(),
                distribution: String::new(),
            },
            ResKind::Language => KindDetails::Language {
                locale: String::new(),
            },
        }
    }

    pub fn kind(&self) -> ResKind {
        match self {
            KindDetails::Package { .. } => ResKind::Package,
            KindDetails::Patch { .. } => ResKind::Patch,
            KindDetails::Atom => ResKind::Atom,
            KindDetails::Pattern { .. } => ResKind::Pattern,
            KindDetails::Selection { .. } => ResKind::Selection,
            KindDetails::Script { .. } => ResKind::Script,
            KindDetails::Message { .. } => ResKind::Message,
            KindDetails::Product { .. } => ResKind::Product,
            KindDetails::Language { .. } => ResKind::Language,
        }
    }
}

/// Any unit the resolver reasons about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolvable {
    name: String,
    edition: Edition,
    arch: Arch,
    vendor: String,
    deps: Dependencies,
    details: KindDetails,
}

impl Resolvable {
    pub fn new(name: impl Into<String>, edition: Edition, details: KindDetails) -> Self {
        Self {
            name: name.into(),
            edition,
            arch: Arch::noarch(),
            vendor: String::new(),
            deps: Dependencies::default(),
            details,
        }
    }

    /// A package with empty details
    pub fn package(name: impl Into<String>, edition: &str) -> Result<Self> {
        Self::of_kind(ResKind::Package, name, edition)
    }

    /// A resolvable of `kind` with empty details
    pub fn of_kind(kind: ResKind, name: impl Into<String>, edition: &str) -> Result<Self> {
        Ok(Self::new(name, Edition::parse(edition)?, KindDetails::empty(kind)))
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Arch::new(arch);
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_details(mut self, details: KindDetails) -> Self {
        self.details = details;
        self
    }

    pub fn requires(mut self, capability: &str) -> Result<Self> {
        self.deps.requires.push(Capability::parse(capability)?);
        Ok(self)
    }

    pub fn provides(mut self, capability: &str) -> Result<Self> {
        self.deps.provides.push(Capability::parse(capability)?);
        Ok(self)
    }

    pub fn conflicts(mut self, capability: &str) -> Result<Self> {
        self.deps.conflicts.push(Capability::parse(capability)?);
        Ok(self)
    }

    pub fn obsoletes(mut self, capability: &str) -> Result<Self> {
        self.deps.obsoletes.push(Capability::parse(capability)?);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edition(&self) -> &Edition {
        &self.edition
    }

    pub fn arch(&self) -> &Arch {
        &self.arch
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn deps(&self) -> &Dependencies {
        &self.deps
    }

    pub fn details(&self) -> &KindDetails {
        &self.details
    }

    pub fn kind(&self) -> ResKind {
        self.details.kind()
    }

    /// Same name and kind
    pub fn same_identity(&self, other: &Resolvable) -> bool {
        self.kind() == other.kind() && self.name == other.name
    }

    pub fn summary(&self) -> Option<&str> {
        match &self.details {
            KindDetails::Package { summary, .. }
            | KindDetails::Pattern { summary, .. }
            | KindDetails::Selection { summary, .. } => Some(summary),
            KindDetails::Product { short_name, .. } => Some(short_name),
            KindDetails::Patch { .. }
            | KindDetails::Atom
            | KindDetails::Script { .. }
            | KindDetails::Message { .. }
            | KindDetails::Language { .. } => None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match &self.details {
            KindDetails::Patch { category, .. }
            | KindDetails::Pattern { category, .. }
            | KindDetails::Selection { category, .. } => Some(category),
            KindDetails::Package { .. }
            | KindDetails::Atom
            | KindDetails::Script { .. }
            | KindDetails::Message { .. }
            | KindDetails::Product { .. }
            | KindDetails::Language { .. } => None,
        }
    }

    /// Whether the resolvable is meant to be shown to users.
    pub fn is_visible(&self) -> bool {
        match &self.details {
            KindDetails::Pattern { visible, .. } | KindDetails::Selection { visible, .. } => {
                *visible
            }
            KindDetails::Package { .. }
            | KindDetails::Patch { .. }
            | KindDetails::Product { .. }
            | KindDetails::Language { .. } => true,
            KindDetails::Atom | KindDetails::Script { .. } | KindDetails::Message { .. } => false,
        }
    }
}

impl fmt::Display for Resolvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind() != ResKind::Package {
            write!(f, "{}:", self.kind())?;
        }
        write!(f, "{}-{}.{}", self.name, self.edition, self.arch)
    }
}

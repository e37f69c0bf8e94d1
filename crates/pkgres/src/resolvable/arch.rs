use std::fmt;

use serde::{Deserialize, Serialize};

/// Architectures each system architecture can install, most preferred first.
const COMPAT_TABLE: &[(&str, &[&str])] = &[
    ("x86_64", &["x86_64", "i686", "i586", "i486", "i386"]),
    ("i686", &["i686", "i586", "i486", "i386"]),
    ("i586", &["i586", "i486", "i386"]),
    ("aarch64", &["aarch64"]),
    ("armv7l", &["armv7l", "armv6l"]),
    ("ppc64le", &["ppc64le"]),
    ("ppc64", &["ppc64", "ppc"]),
    ("s390x", &["s390x", "s390"]),
    ("riscv64", &["riscv64"]),
];

/// Architecture of a resolvable or of the target system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arch(String);

impl Arch {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn noarch() -> Self {
        Self::new("noarch")
    }

    /// Architecture of the running host.
    pub fn host() -> Self {
        match std::env::consts::ARCH {
            "x86" => Self::new("i686"),
            "powerpc64" => Self::new("ppc64"),
            "arm" => Self::new("armv7l"),
            other => Self::new(other),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_noarch(&self) -> bool {
        self.0 == "noarch"
    }

    /// Whether a resolvable built for `self` can be installed on `system`.
    pub fn compatible_with(&self, system: &Arch) -> bool {
        if self.is_noarch() || self == system {
            return true;
        }
        COMPAT_TABLE
            .iter()
            .find(|(sys, _)| *sys == system.as_str())
            .map(|(_, compat)| compat.contains(&self.as_str()))
            .unwrap_or(false)
    }
}

impl Default for Arch {
    fn default() -> Self {
        Self::noarch()
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

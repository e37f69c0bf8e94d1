use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResolverError;

/// Kind of a resolvable. Closed set; `Package` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResKind {
    #[default]
    Package,
    Patch,
    Atom,
    Pattern,
    Selection,
    Script,
    Message,
    Product,
    Language,
}

/// Stable, case-sensitive kind vocabulary.
const KIND_NAMES: [(&str, ResKind); 9] = [
    ("package", ResKind::Package),
    ("patch", ResKind::Patch),
    ("atom", ResKind::Atom),
    ("pattern", ResKind::Pattern),
    ("selection", ResKind::Selection),
    ("script", ResKind::Script),
    ("message", ResKind::Message),
    ("product", ResKind::Product),
    ("language", ResKind::Language),
];

impl ResKind {
    pub fn as_str(&self) -> &'static str {
        KIND_NAMES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("package")
    }

    pub fn all() -> impl Iterator<Item = ResKind> {
        KIND_NAMES.iter().map(|(_, kind)| *kind)
    }

    /// Lenient lookup used when reading resolvable metadata.
    ///
    /// An empty string silently yields `Package`; an unknown name is logged
    /// and also yields `Package`.
    pub fn from_name(name: &str) -> ResKind {
        if name.is_empty() {
            return ResKind::Package;
        }
        name.parse().unwrap_or_else(|_| {
            log::error!("unknown resolvable kind '{}', using 'package'", name);
            ResKind::Package
        })
    }
}

impl FromStr for ResKind {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KIND_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| ResolverError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for ResKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ResKind::all() {
            assert_eq!(ResKind::from_name(kind.as_str()), kind);
        }
        assert_eq!(ResKind::all().count(), 9);
    }

    #[test]
    fn test_kind_default() {
        assert_eq!(ResKind::default(), ResKind::Package);
        assert_eq!(ResKind::from_name(""), ResKind::Package);
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        assert_eq!(ResKind::from_name("srcpackage"), ResKind::Package);
        assert_eq!(ResKind::from_name("Patch"), ResKind::Package); // case-sensitive
        assert!(matches!("srcpackage".parse::<ResKind>(), Err(ResolverError::UnknownKind(_))));
    }

    #[test]
    fn test_kind_serde() {
        let kind: ResKind = serde_json::from_str("\"pattern\"").unwrap();
        assert_eq!(kind, ResKind::Pattern);
        assert_eq!(serde_json::to_string(&ResKind::Language).unwrap(), "\"language\"");
    }
}

//! Dependency capabilities: a name with an optional versioned relation.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::edition::{Edition, EditionError};
use crate::operator::Rel;

lazy_static! {
    static ref CAPABILITY_RE: Regex =
        Regex::new(r"^\s*([^\s<>=!]+)\s*(?:(<=|>=|==|!=|<>|=|<|>)\s*(\S+))?\s*$").unwrap();
}

/// Error type for capability parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("Could not parse capability \"{0}\"")]
    Malformed(String),
    #[error("Invalid edition in capability \"{capability}\": {source}")]
    Edition {
        capability: String,
        #[source]
        source: EditionError,
    },
}

/// A named capability, e.g. `libfoo`, `libfoo >= 3` or `editor = 2.0-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    name: String,
    constraint: Option<(Rel, Edition)>,
}

impl Capability {
    /// Unversioned capability
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: None,
        }
    }

    /// Versioned capability
    pub fn versioned(name: impl Into<String>, rel: Rel, edition: Edition) -> Self {
        Self {
            name: name.into(),
            constraint: Some((rel, edition)),
        }
    }

    /// Parse `name [op edition]`
    pub fn parse(input: &str) -> Result<Self, CapabilityError> {
        let caps = CAPABILITY_RE
            .captures(input)
            .ok_or_else(|| CapabilityError::Malformed(input.to_string()))?;

        let name = caps[1].to_string();
        match (caps.get(2), caps.get(3)) {
            (Some(op), Some(edition)) => {
                let rel = Rel::from_str(op.as_str())
                    .map_err(|_| CapabilityError::Malformed(input.to_string()))?;
                let edition = Edition::parse(edition.as_str()).map_err(|source| {
                    CapabilityError::Edition {
                        capability: input.to_string(),
                        source,
                    }
                })?;
                Ok(Self::versioned(name, rel, edition))
            }
            _ => Ok(Self::named(name)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rel(&self) -> Option<Rel> {
        self.constraint.as_ref().map(|(rel, _)| *rel)
    }

    pub fn edition(&self) -> Option<&Edition> {
        self.constraint.as_ref().map(|(_, edition)| edition)
    }

    /// Whether a provided capability satisfies this one.
    ///
    /// Unversioned provides satisfy any relation on the same name. Only `=`
    /// provides carry a point edition; ranged provides are treated as
    /// overlapping.
    pub fn is_satisfied_by(&self, provided: &Capability) -> bool {
        if self.name != provided.name {
            return false;
        }
        let Some((rel, required)) = &self.constraint else {
            return true;
        };
        match &provided.constraint {
            Some((Rel::Equal, edition)) => rel.holds(edition.match_cmp(required)),
            _ => true,
        }
    }

    /// Whether a concrete `name`/`edition` pair matches this capability.
    pub fn matches(&self, name: &str, edition: &Edition) -> bool {
        self.is_satisfied_by(&Capability::versioned(name, Rel::Equal, edition.clone()))
    }
}

impl std::str::FromStr for Capability {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::parse(s)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some((rel, edition)) => write!(f, "{} {} {}", self.name, rel, edition),
            None => write!(f, "{}", self.name),
        }
    }
}

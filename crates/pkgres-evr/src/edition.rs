//! Edition: `[epoch:]version[-release]`

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

use crate::comparator::vercmp;

/// Error type for edition parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditionError {
    #[error("Empty edition string")]
    Empty,
    #[error("Invalid epoch in edition \"{0}\"")]
    InvalidEpoch(String),
    #[error("Missing version in edition \"{0}\"")]
    MissingVersion(String),
}

/// Version of a resolvable, ordered epoch first, then version, then release.
#[derive(Debug, Clone, Eq)]
pub struct Edition {
    epoch: u32,
    version: String,
    release: Option<String>,
}

impl Edition {
    /// Create an edition from its parts
    pub fn new(epoch: u32, version: impl Into<String>, release: Option<String>) -> Self {
        Self {
            epoch,
            version: version.into(),
            release: release.filter(|r| !r.is_empty()),
        }
    }

    /// Parse `[epoch:]version[-release]`. The release is everything after the last `-`.
    pub fn parse(input: &str) -> Result<Self, EditionError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EditionError::Empty);
        }

        let (epoch, rest) = match input.split_once(':') {
            Some((epoch, rest)) => {
                let epoch = epoch
                    .parse::<u32>()
                    .map_err(|_| EditionError::InvalidEpoch(input.to_string()))?;
                (epoch, rest)
            }
            None => (0, input),
        };

        let (version, release) = match rest.rsplit_once('-') {
            Some((version, release)) => (version, Some(release.to_string())),
            None => (rest, None),
        };

        if version.is_empty() {
            return Err(EditionError::MissingVersion(input.to_string()));
        }

        Ok(Self::new(epoch, version, release))
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }

    /// Compare for capability matching: the release only takes part when both
    /// sides carry one, so `libfoo >= 3` is satisfied by `3-1`.
    pub fn match_cmp(&self, other: &Edition) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| vercmp(&self.version, &other.version))
            .then_with(|| match (&self.release, &other.release) {
                (Some(a), Some(b)) => vercmp(a, b),
                _ => Ordering::Equal,
            })
    }
}

impl Ord for Edition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| vercmp(&self.version, &other.version))
            .then_with(|| {
                vercmp(
                    self.release.as_deref().unwrap_or(""),
                    other.release.as_deref().unwrap_or(""),
                )
            })
    }
}

impl PartialOrd for Edition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Edition {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl std::str::FromStr for Edition {
    type Err = EditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Edition::parse(s)
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.version)?;
        if let Some(release) = &self.release {
            write!(f, "-{}", release)?;
        }
        Ok(())
    }
}

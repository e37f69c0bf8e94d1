//! Relational operators for versioned capabilities

use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Comparison operators for versioned capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rel {
    /// Equal (=)
    Equal,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Not equal (!=)
    NotEqual,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid relational operator: {0}")]
pub struct InvalidRelError(pub String);

impl Rel {
    /// Parse operator from string
    pub fn from_str(s: &str) -> Result<Self, InvalidRelError> {
        match s {
            "=" | "==" => Ok(Rel::Equal),
            "<" => Ok(Rel::LessThan),
            "<=" => Ok(Rel::LessThanOrEqual),
            ">" => Ok(Rel::GreaterThan),
            ">=" => Ok(Rel::GreaterThanOrEqual),
            "!=" | "<>" => Ok(Rel::NotEqual),
            _ => Err(InvalidRelError(s.to_string())),
        }
    }

    /// Get the string representation of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Rel::Equal => "=",
            Rel::LessThan => "<",
            Rel::LessThanOrEqual => "<=",
            Rel::GreaterThan => ">",
            Rel::GreaterThanOrEqual => ">=",
            Rel::NotEqual => "!=",
        }
    }

    /// Whether `lhs <op> rhs` holds, given `lhs.cmp(rhs)`.
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Rel::Equal => ordering == Ordering::Equal,
            Rel::LessThan => ordering == Ordering::Less,
            Rel::LessThanOrEqual => ordering != Ordering::Greater,
            Rel::GreaterThan => ordering == Ordering::Greater,
            Rel::GreaterThanOrEqual => ordering != Ordering::Less,
            Rel::NotEqual => ordering != Ordering::Equal,
        }
    }
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Edition handling for package resolution
//!
//! This crate provides `[epoch:]version[-release]` parsing, rpm-style version
//! comparison and the dependency capabilities (`libfoo >= 3`) the resolver
//! matches providers against.

pub mod capability;
mod comparator;
mod edition;
mod operator;

pub use capability::{Capability, CapabilityError};
pub use comparator::vercmp;
pub use edition::{Edition, EditionError};
pub use operator::{InvalidRelError, Rel};

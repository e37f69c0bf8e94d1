//! Resolvable model: kinds, architectures and per-kind data.

mod arch;
mod kind;
mod resolvable;

pub use arch::Arch;
pub use kind::ResKind;
pub use resolvable::{Dependencies, KindDetails, Resolvable};

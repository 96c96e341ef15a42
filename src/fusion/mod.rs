//! Hypothesis fusion: align, vote, and decide on re-decodes.

pub mod align;
#[allow(clippy::module_inception)]
pub mod fusion;

pub use fusion::Fusion;

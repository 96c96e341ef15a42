//! Immutable, read-only scripture corpus: loading and search.

pub mod index;
pub mod store;
pub mod types;

pub use index::ScriptureIndex;
pub use types::ScriptureError;

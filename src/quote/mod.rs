//! Three-stage scripture-quote matcher: detect candidates, retrieve fuzzy
//! matches, verify semantically, then apply the canonical replacement
//! decision table.

pub mod detect;
pub mod engine;
pub mod replace;
pub mod retrieve;
pub mod types;
pub mod verify;

pub use engine::{QuoteEngine, QuoteOutcome};
pub use types::QuoteError;

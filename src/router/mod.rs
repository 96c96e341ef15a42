//! Language/domain routing: labels each chunk with a [`crate::types::Route`]
//! that decides which ASR engines run on it.

mod rules;

pub use rules::{LanguageHint, Router, RouterInput};

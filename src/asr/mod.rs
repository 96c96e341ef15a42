//! ASR engines: a uniform `AsrEngine` trait with three registered
//! implementations (general, Indic-tuned, English-tuned), all backed by
//! whisper.cpp via `whisper-rs`.

pub mod engine;
pub mod english_engine;
pub mod indic_engine;
pub mod types;
pub mod whisper_engine;

pub use engine::{AsrEngine, AsrError};

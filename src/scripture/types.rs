//! Scripture index error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptureError {
    #[error("scripture index file not found: {path}")]
    IndexFileMissing { path: String },

    #[error("scripture index query failed: {message}")]
    QueryFailed { message: String },

    #[error("line not found: {line_id}")]
    NotFound { line_id: String },
}

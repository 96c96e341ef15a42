//! Script-conversion error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("script conversion failed: {message}")]
    Failed { message: String },
}

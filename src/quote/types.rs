//! Quote-matching error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("scripture index unavailable mid-job: {message}")]
    IndexUnavailable { message: String },
}

//! Error kinds surfaced by the external collaborators.
//!
//! The session never branches on the cause of a failure: each kind only
//! carries a diagnostic detail for the log, while the user sees a fixed
//! apology.

use thiserror::Error;

/// Account ingestion failed (network, invalid handle, downstream failure).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("account processing failed: {detail}")]
pub struct ProcessingError {
    pub detail: String,
}

impl ProcessingError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Reply generation failed for a chat turn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("response generation failed: {detail}")]
pub struct GenerationError {
    pub detail: String,
}

impl GenerationError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

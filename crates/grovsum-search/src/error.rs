//! Error types for the search crate.

use grovsum_hal::HalError;
use grovsum_ir::IrError;
use thiserror::Error;

/// Errors that can occur while building or running a search.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// Circuit construction failed.
    #[error("Circuit construction failed: {0}")]
    Ir(#[from] IrError),

    /// The execution backend failed. Never retried.
    #[error("Backend error: {0}")]
    Backend(#[from] HalError),

    /// Problem or run parameters are out of range.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

//! Error types for the reader library.

use thiserror::Error;

/// Result type alias for reader operations
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Errors that can occur while classifying, extracting or stitching a page.
///
/// None of these escape the top-level entry points on [`crate::Reader`]: they
/// are logged and degrade to "no article".
#[derive(Error, Debug)]
pub enum ReaderError {
    /// Invalid URL provided
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Document structure is missing something the walk needs (e.g. a body)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A score was accumulated onto a node that was never initialized
    #[error("Node has no readability score; it must be initialized before accumulating")]
    UnscoredNode,

    /// The fetch collaborator failed to deliver a page
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The host aborted a fetch; the stitcher stops as cancelled
    #[error("Pagination session cancelled")]
    Cancelled,
}

//! Error types for STL decoding and mesh encoding.

use thiserror::Error;

/// Errors that can occur while converting a mesh.
///
/// Every error is local to the file being converted. Nothing here is caught
/// inside the crate; the caller decides whether a batch continues.
#[derive(Error, Debug)]
pub enum StlError {
    /// Leading bytes match neither the ASCII nor the binary encoding.
    #[error("cannot detect STL encoding: {0}")]
    FormatDetection(String),

    /// Malformed ASCII STL: wrong keyword, wrong float count, or early end of input.
    #[error("parse error at line {line}: expected {expected}, found {found:?}")]
    Parse {
        /// Line number (1-indexed).
        line: usize,
        /// What the grammar required at this point.
        expected: String,
        /// What the input actually held.
        found: String,
    },

    /// Binary STL shorter than its declared facet count requires.
    #[error("truncated binary STL: header declares {declared} facets, only {available} present")]
    Truncated {
        /// Facet count from the binary header.
        declared: u32,
        /// Complete facet records actually available.
        available: u32,
    },

    /// Open, read, write or close failure on the underlying handle.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StlError {
    /// Create a parse error.
    pub fn parse(line: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Parse {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a format detection error.
    pub fn detection(message: impl Into<String>) -> Self {
        Self::FormatDetection(message.into())
    }
}

/// Result type for mesh conversion operations.
pub type Result<T> = std::result::Result<T, StlError>;

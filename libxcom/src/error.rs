use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
/// Possible `libxcom` errors
pub enum Error {
    /// Error returned if an archive or companion file does not exist
    #[error("source not found: {}", path.display())]
    SourceNotFound {
        /// path that was looked up
        path: PathBuf,
    },
    /// Error returned if the source length is not an exact multiple of the
    /// record width of the format
    #[error("source size {size} is not a multiple of the {record_len} byte record length")]
    InvalidSize {
        /// size of the source in bytes
        size: u64,
        /// expected record width in bytes
        record_len: usize,
    },
    /// Error returned if the stream ends mid-record or before the declared
    /// number of records is available
    #[error("truncated {what}: expected {expected}, found {found}")]
    Truncated {
        /// what was being read
        what: &'static str,
        /// number of units (bytes or records) expected
        expected: usize,
        /// number of units actually available
        found: usize,
    },
    /// Error returned if a tile reference points past the end of its table
    #[error("reference {reference} is out of range for a table of {len} entries")]
    OutOfRange {
        /// the offending reference
        reference: usize,
        /// the length of the table it was resolved against
        len: usize,
    },
    /// Any other I/O failure
    #[error("i/o error")]
    Io(#[from] io::Error),
}

/// Coarse error categories, for callers that want to branch on the kind of
/// failure rather than its details
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum ErrorKind {
    /// A required file is missing
    SourceNotFound,
    /// The source does not have the shape of the format
    Format,
    /// The source ended early
    Truncation,
    /// A reference could not be resolved
    OutOfRange,
    /// Other I/O failure
    Io,
}

impl Error {
    /// Returns the [`ErrorKind`] of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Self::InvalidSize { .. } => ErrorKind::Format,
            Self::Truncated { .. } => ErrorKind::Truncation,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

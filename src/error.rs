//! Error types for UCF container operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when working with UCF documents, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. You can
//! handle errors using pattern matching or the `?` operator:
//!
//! ```rust,no_run
//! use ucf::{Container, Result};
//!
//! fn mimetype_of(path: &str) -> Result<String> {
//!     let container = Container::open(path)?;
//!     Ok(container.mimetype().to_string())
//! }
//! ```
//!
//! For fine-grained handling, match on specific variants:
//!
//! ```rust,no_run
//! use ucf::{Container, Error};
//!
//! match Container::open("document.ucf") {
//!     Ok(container) => println!("{}", container.mimetype()),
//!     Err(Error::Malformed(reason)) => eprintln!("not a valid container: {}", reason),
//!     Err(Error::Zip(e)) => eprintln!("broken zip archive: {}", e),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! ```

use std::io;

/// The main error type for UCF container operations.
///
/// Errors fall into three layers:
///
/// | Layer | Variants | Typical cause |
/// |-------|----------|---------------|
/// | File system | [`Io`][Self::Io] | Missing file, permissions |
/// | Archive | [`Zip`][Self::Zip], [`EntryNotFound`][Self::EntryNotFound], [`EntryExists`][Self::EntryExists] | ZIP structure, entry collisions |
/// | Container | [`Malformed`][Self::Malformed], [`ReservedNameClash`][Self::ReservedNameClash] | UCF invariant violations |
///
/// Archive-layer errors propagate unwrapped, except during the mimetype
/// invariant check where they are re-classified as [`Malformed`][Self::Malformed].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The underlying ZIP archive could not be read or written.
    ///
    /// This wraps errors from the ZIP codec: truncated central directory,
    /// bad signatures, unsupported compression, and similar structural
    /// problems below the container layer.
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A structural container invariant was violated.
    ///
    /// This covers a missing, misplaced, or compressed `mimetype` entry, a
    /// required managed entry that is absent, and managed-entry content that
    /// fails validation. The string describes the specific violation.
    #[error("malformed UCF document: {0}")]
    Malformed(String),

    /// An attempt was made to create, overwrite, or rename into a reserved
    /// or managed name.
    ///
    /// The check is case-insensitive and ignores one trailing `/`, so
    /// `mimetype`, `MimeType`, and `META-INF/` all clash. The offending name
    /// is carried verbatim.
    #[error("'{name}' is reserved and cannot be written to")]
    ReservedNameClash {
        /// The name that clashed with a reserved or managed name.
        name: String,
    },

    /// A mutation targeted an entry that does not exist in the archive.
    #[error("entry not found: {path}")]
    EntryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// An entry with the target name already exists in the archive.
    #[error("entry already exists: {path}")]
    EntryExists {
        /// The path that already exists.
        path: String,
    },
}

impl Error {
    /// Creates a [`Malformed`][Self::Malformed] error from any message.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::Malformed(reason.into())
    }

    /// Returns `true` if this error reports a violated container invariant.
    ///
    /// [`Container::verify`][crate::Container::verify] returns `false` for
    /// exactly the inputs whose strict counterpart surfaces an error, most
    /// commonly of this kind.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Malformed(_))
    }

    /// Returns `true` if this error was a rejected write to a protected name.
    pub fn is_name_clash(&self) -> bool {
        matches!(self, Error::ReservedNameClash { .. })
    }

    /// Returns the entry name or path associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::ReservedNameClash { name } => Some(name),
            Error::EntryNotFound { path } => Some(path),
            Error::EntryExists { path } => Some(path),
            _ => None,
        }
    }
}

/// A specialized Result type for UCF operations.
///
/// This is defined as `std::result::Result<T, Error>` for convenience.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_malformed() {
        let err = Error::malformed("'mimetype' file is missing");
        assert!(err.is_malformed());
        assert_eq!(
            err.to_string(),
            "malformed UCF document: 'mimetype' file is missing"
        );
    }

    #[test]
    fn test_reserved_name_clash() {
        let err = Error::ReservedNameClash {
            name: "META-INF".into(),
        };
        assert!(err.is_name_clash());
        assert_eq!(err.entry_name(), Some("META-INF"));
        assert!(err.to_string().contains("META-INF"));
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_entry_not_found() {
        let err = Error::EntryNotFound {
            path: "dir/file.txt".into(),
        };
        assert_eq!(err.to_string(), "entry not found: dir/file.txt");
        assert_eq!(err.entry_name(), Some("dir/file.txt"));
    }

    #[test]
    fn test_entry_exists() {
        let err = Error::EntryExists {
            path: "file.txt".into(),
        };
        assert_eq!(err.to_string(), "entry already exists: file.txt");
        assert_eq!(err.entry_name(), Some("file.txt"));
    }

    #[test]
    fn test_classification_is_exclusive() {
        let err = Error::malformed("x");
        assert!(!err.is_name_clash());
        let err = Error::ReservedNameClash { name: "x".into() };
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_entry_name_absent_for_layer_errors() {
        let err = Error::malformed("x");
        assert_eq!(err.entry_name(), None);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}

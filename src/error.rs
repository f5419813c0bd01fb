//! # Error Handling
//!
//! This module defines the error type shared by every `deploy-origin`
//! operation. It uses the `thiserror` library to build a single `Error` enum
//! whose variants map one-to-one onto the ways an origin can be rejected.
//!
//! ## Key Components
//!
//! - **`Error`**: All failure modes of parsing and mutating an origin:
//!   - A document with no refspec at all.
//!   - A refspec string the classifier rejects.
//!   - A malformed `sha256:NEVRA` (or plain NEVRA) package identifier.
//!   - A package request that already exists.
//!   - A package removal for something that was never requested.
//!   - An override that collides with an existing one.
//!   - Malformed key-file text.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Every error is returned synchronously. Nothing here is retried or logged;
//! callers surface the message as-is.

use thiserror::Error;

/// Main error type for origin operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Neither `origin/refspec` nor `origin/baserefspec` is present.
    #[error("No origin/refspec, or origin/baserefspec in current deployment origin")]
    MissingRefspec,

    /// The refspec string could not be classified.
    #[error("Invalid refspec '{refspec}': {message}")]
    InvalidRefspec { refspec: String, message: String },

    /// A package identifier did not decompose as a NEVRA or `sha256:NEVRA`.
    #[error("Invalid package identifier '{input}': {message}")]
    InvalidPackageEncoding { input: String, message: String },

    /// The package string is already present in one of the request
    /// collections.
    ///
    /// `local` records which collection held it, since the wording differs.
    #[error("{}", if *local { format!("Package '{package}' is already layered") } else { format!("Package/capability '{package}' is already requested") })]
    DuplicateRequest { package: String, local: bool },

    /// A removal named a package that is not requested.
    #[error("Package/capability '{package}' is not currently requested")]
    NotRequested { package: String },

    /// An override already exists for this package name.
    #[error("Override already exists for package '{package}'")]
    DuplicateOverride { package: String },

    /// The key-file text could not be parsed.
    #[error("Key file parse error at line {line}: {message}")]
    KeyFileParse { line: usize, message: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

//! Refspec classification
//!
//! A refspec names the content source of a deployment. Two kinds exist:
//!
//! - **Branch**: `[remote:]ref`, optionally written with an `ostree://`
//!   prefix, which is stripped.
//! - **Commit**: a bare 64-character lowercase hex commit checksum.
//!
//! ```
//! use deploy_origin::refspec::{classify, RefspecKind};
//!
//! let branch = classify("ostree://fedora:fedora/36/x86_64/silverblue").unwrap();
//! assert_eq!(branch.kind(), RefspecKind::Branch);
//! assert_eq!(branch.target(), "fedora:fedora/36/x86_64/silverblue");
//!
//! let pinned = classify(&"ab".repeat(32)).unwrap();
//! assert_eq!(pinned.kind(), RefspecKind::Commit);
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::nevra::is_sha256;

const OSTREE_PREFIX: &str = "ostree://";

/// The kind of content source a refspec names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum RefspecKind {
    /// A branch followed by plain upgrades
    Branch,
    /// A single pinned commit
    Commit,
}

impl fmt::Display for RefspecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefspecKind::Branch => write!(f, "branch"),
            RefspecKind::Commit => write!(f, "commit"),
        }
    }
}

/// A classified refspec
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Refspec {
    kind: RefspecKind,
    target: String,
}

impl Refspec {
    pub fn kind(&self) -> RefspecKind {
        self.kind
    }

    /// Canonical target: branch (with remote, if any) or commit checksum
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The remote part of a `remote:ref` branch refspec
    pub fn remote(&self) -> Option<&str> {
        match self.kind {
            RefspecKind::Branch => self.target.split_once(':').map(|(remote, _)| remote),
            RefspecKind::Commit => None,
        }
    }
}

impl fmt::Display for Refspec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target)
    }
}

/// Classify a refspec string.
///
/// # Errors
///
/// Returns `Error::InvalidRefspec` for an empty string, embedded whitespace, or
/// a `remote:` with nothing after it.
pub fn classify(refspec: &str) -> Result<Refspec> {
    let invalid = |message: &str| Error::InvalidRefspec {
        refspec: refspec.to_string(),
        message: message.to_string(),
    };

    if refspec.is_empty() {
        return Err(invalid("refspec is empty"));
    }
    if refspec.chars().any(char::is_whitespace) {
        return Err(invalid("refspec contains whitespace"));
    }

    if is_sha256(refspec) {
        return Ok(Refspec {
            kind: RefspecKind::Commit,
            target: refspec.to_string(),
        });
    }

    let target = refspec.strip_prefix(OSTREE_PREFIX).unwrap_or(refspec);
    let branch = match target.split_once(':') {
        Some((_, branch)) => branch,
        None => target,
    };
    if branch.is_empty() {
        return Err(invalid("missing branch name"));
    }

    Ok(Refspec {
        kind: RefspecKind::Branch,
        target: target.to_string(),
    })
}

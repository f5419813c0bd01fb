//! # Deployment Origin Library
//!
//! This library models the *origin* of an image-based deployment: which
//! content source it tracks, which packages are layered on top, which base
//! packages are overridden, and how the initramfs is customized. It is used
//! by the `deploy-origin` command-line tool but has no I/O of its own, so it
//! can sit underneath any deployment manager.
//!
//! ## Quick Example
//!
//! ```
//! use deploy_origin::origin::{Origin, OverrideKind};
//!
//! let mut origin = Origin::from_data("[origin]\nrefspec=fedora:fedora/36/x86_64/silverblue\n").unwrap();
//!
//! origin.add_packages(&["vim-enhanced"], false, false).unwrap();
//! origin.add_overrides(&["firefox"], OverrideKind::RemoveBase).unwrap();
//! assert!(origin.requires_local_assembly());
//!
//! let text = origin.to_data();
//! assert!(text.contains("baserefspec=fedora:fedora/36/x86_64/silverblue"));
//! assert!(text.contains("requested=vim-enhanced;"));
//! assert!(text.contains("remove=firefox;"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Key file (`keyfile`)**: The persisted document, the only source of
//!   truth. Sections of typed entries with optional comments.
//! - **Origin (`origin`)**: A structured cache parsed from the key file.
//!   Every mutation goes through [`origin::Origin`], which updates the cache
//!   and writes the change back to the document in one step.
//! - **Refspecs (`refspec`)**: Classification of content-source strings into
//!   branches and pinned commits.
//! - **Package identifiers (`nevra`)**: Decomposition of NEVRA and
//!   `sha256:NEVRA` strings.
//!
//! ## Concurrency
//!
//! An [`origin::Origin`] has a single owner and no interior locking. Work on
//! an independent copy with [`origin::Origin::duplicate`] when two tasks need
//! to edit the same origin.

pub mod error;
pub mod keyfile;
pub mod nevra;
pub mod origin;
pub mod output;
pub mod refspec;

#[cfg(test)]
mod origin_proptest;

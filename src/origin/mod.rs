//! # Deployment Origin
//!
//! An [`Origin`] records how a deployment was derived: its content source
//! (refspec), requested package layering, base package overrides and
//! initramfs tweaks. The persisted [`KeyFile`] is the single source of truth;
//! the structured fields are a cache computed from it at parse time and kept
//! in step by every mutation.
//!
//! ## Document layout
//!
//! | Section     | Key                         | Meaning                              |
//! |-------------|-----------------------------|--------------------------------------|
//! | `origin`    | `refspec` / `baserefspec`   | content source (exactly one present) |
//! | `origin`    | `override-commit`           | pinned commit checksum               |
//! | `origin`    | `custom-url`, `custom-description` | custom pinned-origin metadata |
//! | `origin`    | `unconfigured-state`        | opaque upgrade-blocking message      |
//! | `packages`  | `requested`                 | remote package/capability requests   |
//! | `packages`  | `requested-local`           | `sha256:NEVRA` local packages        |
//! | `overrides` | `remove`                    | base package removals                |
//! | `overrides` | `replace-local`             | `sha256:NEVRA` local replacements    |
//! | `rpmostree` | `regenerate-initramfs`      | initramfs regeneration flag          |
//! | `rpmostree` | `initramfs-args`            | extra regeneration arguments         |
//! | `rpmostree` | `initramfs-etc`             | extra tracked `/etc` paths           |
//! | `rpmostree` | `ex-cliwrap`                | CLI-wrapping flag                    |
//!
//! ## Refspec key
//!
//! Once any local customization is present ([`Origin::requires_local_assembly`]),
//! the refspec lives under `baserefspec` so that tools which only know plain
//! branch upgrades leave the deployment alone. Otherwise it lives under
//! `refspec`. Every mutation that can flip that predicate re-syncs the key.
//!
//! ## Example
//!
//! ```
//! use deploy_origin::origin::Origin;
//!
//! let mut origin = Origin::from_data("[origin]\nrefspec=fedora/36/x86_64/silverblue\n").unwrap();
//! assert!(!origin.requires_local_assembly());
//!
//! assert!(origin.add_packages(&["vim-enhanced"], false, false).unwrap());
//! assert!(origin.requires_local_assembly());
//! assert_eq!(
//!     origin.get_string("origin", "baserefspec").as_deref(),
//!     Some("fedora/36/x86_64/silverblue")
//! );
//! assert!(origin.get_string("origin", "refspec").is_none());
//! ```

mod initramfs;
mod overrides;
mod packages;
mod rebase;

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::error::{Error, Result};
use crate::keyfile::KeyFile;
use crate::nevra::decompose_sha256_nevra;
use crate::refspec::{classify, Refspec};

pub use overrides::OverrideKind;
pub use rebase::CustomOrigin;

pub(crate) const ORIGIN: &str = "origin";
pub(crate) const REFSPEC: &str = "refspec";
pub(crate) const BASEREFSPEC: &str = "baserefspec";
pub(crate) const OVERRIDE_COMMIT: &str = "override-commit";
pub(crate) const CUSTOM_URL: &str = "custom-url";
pub(crate) const CUSTOM_DESCRIPTION: &str = "custom-description";
pub(crate) const UNCONFIGURED_STATE: &str = "unconfigured-state";

pub(crate) const PACKAGES: &str = "packages";
pub(crate) const REQUESTED: &str = "requested";
pub(crate) const REQUESTED_LOCAL: &str = "requested-local";

pub(crate) const OVERRIDES: &str = "overrides";
pub(crate) const OVERRIDE_REMOVE: &str = "remove";
pub(crate) const OVERRIDE_REPLACE_LOCAL: &str = "replace-local";

pub(crate) const RPMOSTREE: &str = "rpmostree";
pub(crate) const REGENERATE_INITRAMFS: &str = "regenerate-initramfs";
pub(crate) const INITRAMFS_ARGS: &str = "initramfs-args";
pub(crate) const INITRAMFS_ETC: &str = "initramfs-etc";
pub(crate) const CLIWRAP: &str = "ex-cliwrap";

/// Section libostree reserves for per-deployment state
pub(crate) const TRANSIENT_SECTION: &str = "libostree-transient";

/// A deployment origin: the key-file document plus its structured cache
#[derive(Debug)]
pub struct Origin {
    /// Single source of truth
    kf: KeyFile,

    refspec: Refspec,
    /// Refspec text as stored in the document, which may keep an
    /// `ostree://` prefix the classified target drops
    refspec_text: String,
    override_commit: Option<String>,
    custom_origin: Option<CustomOrigin>,
    unconfigured_state: Option<String>,

    /// Remote requests: package names or provides
    packages: BTreeSet<String>,
    /// NEVRA -> header sha256
    local_packages: BTreeMap<String, String>,
    /// Bare package names
    overrides_remove: BTreeSet<String>,
    /// NEVRA -> header sha256
    overrides_local_replace: BTreeMap<String, String>,

    initramfs_etc_files: BTreeSet<String>,
    initramfs_args: Vec<String>,
    regenerate_initramfs: bool,
    cliwrap: bool,
}

impl Origin {
    /// Build an origin from a key-file document.
    ///
    /// The document is copied; later changes to `kf` do not affect the
    /// returned origin. Nothing is returned unless every step succeeds.
    ///
    /// # Errors
    ///
    /// - `Error::MissingRefspec` if neither `origin/refspec` nor
    ///   `origin/baserefspec` is set
    /// - `Error::InvalidRefspec` if the refspec does not classify
    /// - `Error::InvalidPackageEncoding` for a bad `sha256:NEVRA` entry
    pub fn parse(kf: &KeyFile) -> Result<Self> {
        let kf = kf.duplicate()?;

        let refspec = kf
            .get_string(ORIGIN, REFSPEC)
            .or_else(|| kf.get_string(ORIGIN, BASEREFSPEC))
            .ok_or(Error::MissingRefspec)?;
        let refspec_text = refspec;
        let refspec = classify(&refspec_text)?;

        let override_commit = kf.get_string(ORIGIN, OVERRIDE_COMMIT);
        let unconfigured_state = kf.get_string(ORIGIN, UNCONFIGURED_STATE);
        let custom_origin = nonempty_string(&kf, ORIGIN, CUSTOM_URL).map(|url| CustomOrigin {
            url,
            description: nonempty_string(&kf, ORIGIN, CUSTOM_DESCRIPTION).unwrap_or_default(),
        });

        let packages = parse_set(&kf, PACKAGES, REQUESTED);
        let local_packages = parse_sha256_map(&kf, PACKAGES, REQUESTED_LOCAL)?;
        let overrides_remove = parse_set(&kf, OVERRIDES, OVERRIDE_REMOVE);
        let overrides_local_replace = parse_sha256_map(&kf, OVERRIDES, OVERRIDE_REPLACE_LOCAL)?;

        let initramfs_etc_files = parse_set(&kf, RPMOSTREE, INITRAMFS_ETC);
        let initramfs_args = kf
            .get_string_list(RPMOSTREE, INITRAMFS_ARGS)
            .unwrap_or_default();
        let regenerate_initramfs = kf
            .get_boolean(RPMOSTREE, REGENERATE_INITRAMFS)
            .unwrap_or(false);
        let cliwrap = kf.get_boolean(RPMOSTREE, CLIWRAP).unwrap_or(false);

        Ok(Self {
            kf,
            refspec,
            refspec_text,
            override_commit,
            custom_origin,
            unconfigured_state,
            packages,
            local_packages,
            overrides_remove,
            overrides_local_replace,
            initramfs_etc_files,
            initramfs_args,
            regenerate_initramfs,
            cliwrap,
        })
    }

    /// Parse key-file text and build an origin from it
    pub fn from_data(data: &str) -> Result<Self> {
        Self::parse(&KeyFile::parse(data)?)
    }

    /// An independent copy, rebuilt from the serialized document
    pub fn duplicate(&self) -> Result<Self> {
        Self::parse(&self.kf)
    }

    /// The underlying document
    pub fn keyfile(&self) -> &KeyFile {
        &self.kf
    }

    /// An independent copy of the underlying document
    pub fn dup_keyfile(&self) -> Result<KeyFile> {
        self.kf.duplicate()
    }

    /// Serialized document text
    pub fn to_data(&self) -> String {
        self.kf.to_data()
    }

    /// Read any string from the document, including keys not modelled here
    pub fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.kf.get_string(section, key)
    }

    pub fn refspec(&self) -> &Refspec {
        &self.refspec
    }

    pub fn override_commit(&self) -> Option<&str> {
        self.override_commit.as_deref()
    }

    /// Cosmetic annotation written next to the override commit, if any
    pub fn override_commit_annotation(&self) -> Option<&str> {
        self.override_commit
            .as_ref()
            .and_then(|_| self.kf.comment(ORIGIN, OVERRIDE_COMMIT))
    }

    pub fn custom_origin(&self) -> Option<&CustomOrigin> {
        self.custom_origin.as_ref()
    }

    pub fn unconfigured_state(&self) -> Option<&str> {
        self.unconfigured_state.as_deref()
    }

    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }

    pub fn local_packages(&self) -> &BTreeMap<String, String> {
        &self.local_packages
    }

    pub fn overrides_remove(&self) -> &BTreeSet<String> {
        &self.overrides_remove
    }

    pub fn overrides_local_replace(&self) -> &BTreeMap<String, String> {
        &self.overrides_local_replace
    }

    pub fn initramfs_etc_files(&self) -> &BTreeSet<String> {
        &self.initramfs_etc_files
    }

    pub fn initramfs_args(&self) -> &[String] {
        &self.initramfs_args
    }

    pub fn regenerate_initramfs(&self) -> bool {
        self.regenerate_initramfs
    }

    pub fn cliwrap(&self) -> bool {
        self.cliwrap
    }

    /// Whether the origin may need a locally assembled image rather than a
    /// plain branch upgrade.
    ///
    /// `false` means definitely not; `true` means some customization is
    /// present and the caller has to look closer.
    pub fn requires_local_assembly(&self) -> bool {
        self.cliwrap
            || self.regenerate_initramfs
            || !self.initramfs_etc_files.is_empty()
            || !self.packages.is_empty()
            || !self.local_packages.is_empty()
            || !self.overrides_local_replace.is_empty()
            || !self.overrides_remove.is_empty()
    }

    /// The document key currently holding the refspec
    pub fn refspec_key(&self) -> &'static str {
        if self.kf.has_key(ORIGIN, BASEREFSPEC) {
            BASEREFSPEC
        } else {
            REFSPEC
        }
    }

    /// Move the refspec to `baserefspec` or `refspec` depending on
    /// [`requires_local_assembly`](Self::requires_local_assembly).
    pub(crate) fn sync_refspec_key(&mut self) {
        let (active, stale) = if self.requires_local_assembly() {
            (BASEREFSPEC, REFSPEC)
        } else {
            (REFSPEC, BASEREFSPEC)
        };
        self.kf.set_string(ORIGIN, active, &self.refspec_text);
        self.kf.remove_key(ORIGIN, stale);
        debug!("refspec '{}' stored under origin/{}", self.refspec, active);
    }
}

fn nonempty_string(kf: &KeyFile, section: &str, key: &str) -> Option<String> {
    kf.get_string(section, key).filter(|value| !value.is_empty())
}

fn parse_set(kf: &KeyFile, section: &str, key: &str) -> BTreeSet<String> {
    kf.get_string_list(section, key)
        .unwrap_or_default()
        .into_iter()
        .collect()
}

fn parse_sha256_map(kf: &KeyFile, section: &str, key: &str) -> Result<BTreeMap<String, String>> {
    kf.get_string_list(section, key)
        .unwrap_or_default()
        .iter()
        .map(|entry| decompose_sha256_nevra(entry))
        .collect()
}

/// Write a set as a string list, removing the key when empty
fn write_set(kf: &mut KeyFile, section: &str, key: &str, values: &BTreeSet<String>) {
    if values.is_empty() {
        kf.remove_key(section, key);
    } else {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        kf.set_string_list(section, key, &values);
    }
}

/// Write a NEVRA -> sha256 map as `sha256:NEVRA` entries, removing the key
/// when empty
fn write_sha256_map(kf: &mut KeyFile, section: &str, key: &str, values: &BTreeMap<String, String>) {
    if values.is_empty() {
        kf.remove_key(section, key);
    } else {
        let entries: Vec<String> = values
            .iter()
            .map(|(nevra, sha256)| format!("{sha256}:{nevra}"))
            .collect();
        kf.set_string_list(section, key, &entries);
    }
}

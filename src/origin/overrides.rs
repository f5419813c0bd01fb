//! Base package overrides
//!
//! Two kinds exist: removing a package from the base image by name, and
//! replacing it with a locally supplied package recorded as `sha256:NEVRA`.
//! A package name may be overridden only once across both kinds.

use std::collections::HashSet;
use std::fmt;

use log::debug;

use super::{
    write_set, write_sha256_map, Origin, OVERRIDES, OVERRIDE_REMOVE, OVERRIDE_REPLACE_LOCAL,
};
use crate::error::{Error, Result};
use crate::nevra::{decompose_sha256_nevra, package_name};

/// Which override collection an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKind {
    /// Remove a base package, identified by bare name
    RemoveBase,
    /// Replace a base package with a local one, identified by `sha256:NEVRA`
    ReplaceLocal,
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideKind::RemoveBase => write!(f, "remove"),
            OverrideKind::ReplaceLocal => write!(f, "replace-local"),
        }
    }
}

impl Origin {
    /// Add overrides of one kind.
    ///
    /// Fails with `Error::DuplicateOverride` if any package name is already
    /// overridden, in either collection or earlier in the same batch. There
    /// is no way to skip existing entries here. The batch is validated before
    /// anything is recorded.
    pub fn add_overrides<S: AsRef<str>>(&mut self, packages: &[S], kind: OverrideKind) -> Result<()> {
        let mut taken: HashSet<String> = self.overrides_remove.iter().cloned().collect();
        for nevra in self.overrides_local_replace.keys() {
            taken.insert(package_name(nevra)?);
            taken.insert(nevra.clone());
        }

        let mut staged: Vec<(String, Option<String>)> = Vec::new();
        for package in packages {
            let package = package.as_ref();
            let (key, name, sha256) = match kind {
                OverrideKind::ReplaceLocal => {
                    let (nevra, sha256) = decompose_sha256_nevra(package)?;
                    let name = package_name(&nevra)?;
                    (nevra, name, Some(sha256))
                }
                OverrideKind::RemoveBase => (package.to_string(), package.to_string(), None),
            };

            if taken.contains(&name) || taken.contains(&key) {
                return Err(Error::DuplicateOverride { package: key });
            }
            taken.insert(name);
            taken.insert(key.clone());
            staged.push((key, sha256));
        }

        if staged.is_empty() {
            return Ok(());
        }

        for (key, sha256) in staged {
            debug!("adding {} override for '{}'", kind, key);
            match sha256 {
                Some(sha256) => {
                    self.overrides_local_replace.insert(key, sha256);
                }
                None => {
                    self.overrides_remove.insert(key);
                }
            }
        }
        self.write_overrides(kind);
        self.sync_refspec_key();
        Ok(())
    }

    /// Remove one override from the named collection.
    ///
    /// `package` is the bare name for [`OverrideKind::RemoveBase`] and the
    /// NEVRA for [`OverrideKind::ReplaceLocal`]. Returns `false` if it was not
    /// there.
    pub fn remove_override(&mut self, package: &str, kind: OverrideKind) -> bool {
        let found = match kind {
            OverrideKind::RemoveBase => self.overrides_remove.remove(package),
            OverrideKind::ReplaceLocal => self.overrides_local_replace.remove(package).is_some(),
        };
        if found {
            debug!("removed {} override for '{}'", kind, package);
            self.write_overrides(kind);
            self.sync_refspec_key();
        }
        found
    }

    /// Remove every override of both kinds.
    ///
    /// Returns whether anything was removed.
    pub fn remove_all_overrides(&mut self) -> bool {
        let remove_changed = !self.overrides_remove.is_empty();
        self.overrides_remove.clear();
        let replace_changed = !self.overrides_local_replace.is_empty();
        self.overrides_local_replace.clear();

        if remove_changed {
            self.write_overrides(OverrideKind::RemoveBase);
        }
        if replace_changed {
            self.write_overrides(OverrideKind::ReplaceLocal);
        }

        let changed = remove_changed || replace_changed;
        if changed {
            debug!("removed all overrides");
            self.sync_refspec_key();
        }
        changed
    }

    fn write_overrides(&mut self, kind: OverrideKind) {
        match kind {
            OverrideKind::RemoveBase => {
                write_set(&mut self.kf, OVERRIDES, OVERRIDE_REMOVE, &self.overrides_remove)
            }
            OverrideKind::ReplaceLocal => write_sha256_map(
                &mut self.kf,
                OVERRIDES,
                OVERRIDE_REPLACE_LOCAL,
                &self.overrides_local_replace,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{BASEREFSPEC, ORIGIN, REFSPEC};
    use super::*;

    #[test]
    fn test_add_remove_override() {
        let mut origin = branch_origin();
        origin
            .add_overrides(&["firefox"], OverrideKind::RemoveBase)
            .unwrap();
        assert!(origin.overrides_remove().contains("firefox"));
        assert_eq!(
            origin.keyfile().get_string_list(OVERRIDES, OVERRIDE_REMOVE).unwrap(),
            vec!["firefox"]
        );
        assert!(origin.requires_local_assembly());
        assert!(origin.keyfile().has_key(ORIGIN, BASEREFSPEC));
    }

    #[test]
    fn test_add_replace_local_override() {
        let mut origin = branch_origin();
        let pkg = local('b', "kernel-5.18.1-200.fc36.x86_64");
        origin
            .add_overrides(&[pkg.as_str()], OverrideKind::ReplaceLocal)
            .unwrap();
        assert_eq!(
            origin
                .overrides_local_replace()
                .get("kernel-5.18.1-200.fc36.x86_64"),
            Some(&csum('b'))
        );
        assert_eq!(
            origin
                .keyfile()
                .get_string_list(OVERRIDES, OVERRIDE_REPLACE_LOCAL)
                .unwrap(),
            vec![pkg]
        );
    }

    #[test]
    fn test_remove_then_replace_same_name_conflicts() {
        let mut origin = branch_origin();
        origin.add_overrides(&["foo"], OverrideKind::RemoveBase).unwrap();
        let err = origin
            .add_overrides(&[local('a', "foo-1-1.x86_64")], OverrideKind::ReplaceLocal)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateOverride { .. }));
        assert!(origin.overrides_local_replace().is_empty());
    }

    #[test]
    fn test_replace_then_remove_same_name_conflicts() {
        let mut origin = branch_origin();
        origin
            .add_overrides(&[local('a', "foo-1-1.x86_64")], OverrideKind::ReplaceLocal)
            .unwrap();
        let err = origin
            .add_overrides(&["foo"], OverrideKind::RemoveBase)
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateOverride {
                package: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_remove_override_has_no_escape() {
        let mut origin = branch_origin();
        origin.add_overrides(&["foo"], OverrideKind::RemoveBase).unwrap();
        assert!(origin
            .add_overrides(&["foo"], OverrideKind::RemoveBase)
            .is_err());
    }

    #[test]
    fn test_batch_conflict_is_atomic() {
        let mut origin = branch_origin();
        let before = origin.to_data();
        assert!(origin
            .add_overrides(&["a", "b", "a"], OverrideKind::RemoveBase)
            .is_err());
        assert!(origin.overrides_remove().is_empty());
        assert_eq!(origin.to_data(), before);
    }

    #[test]
    fn test_invalid_replace_encoding() {
        let mut origin = branch_origin();
        let err = origin
            .add_overrides(&["foo-1-1.x86_64"], OverrideKind::ReplaceLocal)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPackageEncoding { .. }));
    }

    #[test]
    fn test_remove_override_only_touches_named_collection() {
        let mut origin = branch_origin();
        origin.add_overrides(&["foo"], OverrideKind::RemoveBase).unwrap();
        assert!(!origin.remove_override("foo", OverrideKind::ReplaceLocal));
        assert!(origin.remove_override("foo", OverrideKind::RemoveBase));
        assert!(!origin.keyfile().has_key(OVERRIDES, OVERRIDE_REMOVE));
        assert!(!origin.requires_local_assembly());
        assert!(origin.keyfile().has_key(ORIGIN, REFSPEC));
    }

    #[test]
    fn test_remove_replace_override_by_nevra() {
        let mut origin = branch_origin();
        origin
            .add_overrides(&[local('a', "foo-1-1.x86_64")], OverrideKind::ReplaceLocal)
            .unwrap();
        assert!(!origin.remove_override("foo", OverrideKind::ReplaceLocal));
        assert!(origin.remove_override("foo-1-1.x86_64", OverrideKind::ReplaceLocal));
        assert!(origin.overrides_local_replace().is_empty());
    }

    #[test]
    fn test_remove_all_overrides() {
        let mut origin = branch_origin();
        origin.add_overrides(&["foo"], OverrideKind::RemoveBase).unwrap();
        origin
            .add_overrides(&[local('a', "bar-1-1.x86_64")], OverrideKind::ReplaceLocal)
            .unwrap();
        assert!(origin.remove_all_overrides());
        assert!(!origin.keyfile().has_section(OVERRIDES));
        assert_eq!(origin.refspec_key(), REFSPEC);
        assert!(!origin.remove_all_overrides());
    }

    #[test]
    fn test_override_kind_display() {
        assert_eq!(OverrideKind::RemoveBase.to_string(), "remove");
        assert_eq!(OverrideKind::ReplaceLocal.to_string(), "replace-local");
    }
}

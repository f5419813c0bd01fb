//! Package layering requests
//!
//! Remote requests are free-form strings (names or provides) matched by exact
//! string equality. Local requests are keyed by NEVRA and carry the header
//! checksum of the package they were installed from. A given string may live
//! in only one of the two collections.

use std::collections::HashMap;

use log::debug;

use super::{write_set, write_sha256_map, Origin, PACKAGES, REQUESTED, REQUESTED_LOCAL};
use crate::error::{Error, Result};
use crate::nevra::{decompose_sha256_nevra, package_name};

impl Origin {
    /// Request packages.
    ///
    /// With `local`, each entry must be `sha256:NEVRA` and is recorded as a
    /// local request. A string already requested in either collection is a
    /// conflict: skipped when `allow_existing`, an error otherwise. The batch
    /// is validated before anything is recorded.
    ///
    /// Returns whether anything was added.
    pub fn add_packages<S: AsRef<str>>(
        &mut self,
        packages: &[S],
        local: bool,
        allow_existing: bool,
    ) -> Result<bool> {
        let mut staged: Vec<(String, Option<String>)> = Vec::new();

        for package in packages {
            let package = package.as_ref();
            let (key, sha256) = if local {
                let (nevra, sha256) = decompose_sha256_nevra(package)?;
                (nevra, Some(sha256))
            } else {
                (package.to_string(), None)
            };

            let requested = self.packages.contains(&key);
            let requested_local = self.local_packages.contains_key(&key);
            let staged_already = staged.iter().any(|(staged_key, _)| *staged_key == key);

            if requested || requested_local || staged_already {
                if allow_existing {
                    continue;
                }
                let local = if requested || requested_local {
                    requested_local
                } else {
                    local
                };
                return Err(Error::DuplicateRequest {
                    package: key,
                    local,
                });
            }

            staged.push((key, sha256));
        }

        if staged.is_empty() {
            return Ok(false);
        }

        for (key, sha256) in staged {
            debug!("requesting package '{}'", key);
            match sha256 {
                Some(sha256) => {
                    self.local_packages.insert(key, sha256);
                }
                None => {
                    self.packages.insert(key);
                }
            }
        }

        if local {
            write_sha256_map(&mut self.kf, PACKAGES, REQUESTED_LOCAL, &self.local_packages);
        } else {
            write_set(&mut self.kf, PACKAGES, REQUESTED, &self.packages);
        }
        self.sync_refspec_key();
        Ok(true)
    }

    /// Drop package requests.
    ///
    /// Each entry is tried as a local NEVRA, then as a remote request string,
    /// then as the bare name of a local package. An entry matching none of
    /// them is an error unless `allow_noent`.
    ///
    /// Returns whether anything was removed.
    pub fn remove_packages<S: AsRef<str>>(&mut self, packages: &[S], allow_noent: bool) -> Result<bool> {
        let mut remote = self.packages.clone();
        let mut local = self.local_packages.clone();
        let mut name_to_nevra = self.local_name_index()?;
        let mut remote_changed = false;
        let mut local_changed = false;

        for package in packages {
            let package = package.as_ref();
            if local.remove(package).is_some() {
                local_changed = true;
            } else if remote.remove(package) {
                remote_changed = true;
            } else if let Some(nevra) = name_to_nevra
                .remove(package)
                .filter(|nevra| local.contains_key(nevra))
            {
                local.remove(&nevra);
                local_changed = true;
            } else if !allow_noent {
                return Err(Error::NotRequested {
                    package: package.to_string(),
                });
            }
        }

        self.packages = remote;
        self.local_packages = local;

        if remote_changed {
            write_set(&mut self.kf, PACKAGES, REQUESTED, &self.packages);
        }
        if local_changed {
            write_sha256_map(&mut self.kf, PACKAGES, REQUESTED_LOCAL, &self.local_packages);
        }
        self.sync_refspec_key();

        let changed = remote_changed || local_changed;
        if changed {
            debug!("removed package requests: {}", join(packages));
        }
        Ok(changed)
    }

    /// Drop every package request, remote and local.
    ///
    /// Returns whether anything was removed.
    pub fn remove_all_packages(&mut self) -> bool {
        let remote_changed = !self.packages.is_empty();
        let local_changed = !self.local_packages.is_empty();
        self.packages.clear();
        self.local_packages.clear();

        if remote_changed {
            write_set(&mut self.kf, PACKAGES, REQUESTED, &self.packages);
        }
        if local_changed {
            write_sha256_map(&mut self.kf, PACKAGES, REQUESTED_LOCAL, &self.local_packages);
        }

        let changed = remote_changed || local_changed;
        if changed {
            debug!("removed all package requests");
            self.sync_refspec_key();
        }
        changed
    }

    /// Bare package name -> NEVRA for every local request
    fn local_name_index(&self) -> Result<HashMap<String, String>> {
        self.local_packages
            .keys()
            .map(|nevra| Ok((package_name(nevra)?, nevra.clone())))
            .collect()
    }
}

fn join<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<&str>>()
        .join(", ")
}

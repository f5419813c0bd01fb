//! Refspec transitions and commit pinning

use log::debug;
use serde::Serialize;

use super::{
    Origin, BASEREFSPEC, CUSTOM_DESCRIPTION, CUSTOM_URL, ORIGIN, OVERRIDE_COMMIT, REFSPEC,
    TRANSIENT_SECTION,
};
use crate::error::Result;
use crate::refspec::{classify, RefspecKind};

/// Metadata describing where a custom pinned commit came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomOrigin {
    pub url: String,
    pub description: String,
}

impl CustomOrigin {
    pub fn new(url: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: description.into(),
        }
    }
}

impl Origin {
    /// Switch to a new refspec, dropping any custom origin metadata.
    ///
    /// See [`rebase_custom`](Self::rebase_custom).
    pub fn rebase(&mut self, new_refspec: &str) -> Result<()> {
        self.rebase_custom(new_refspec, None)
    }

    /// Switch to a new refspec.
    ///
    /// Any override commit is cleared first, and stays cleared even when the
    /// new refspec then fails to classify.
    ///
    /// # Panics
    ///
    /// If `custom` is given with an empty url or description, or the new
    /// refspec is not a commit checksum.
    pub fn rebase_custom(&mut self, new_refspec: &str, custom: Option<&CustomOrigin>) -> Result<()> {
        if let Some(custom) = custom {
            assert!(
                !custom.url.is_empty() && !custom.description.is_empty(),
                "custom origin url and description must be non-empty"
            );
        }

        self.set_override_commit(None, None);

        let refspec = classify(new_refspec)?;
        if custom.is_some() {
            assert_eq!(
                refspec.kind(),
                RefspecKind::Commit,
                "custom origins must be pinned to a commit"
            );
        }

        let key = if self.kf.has_key(ORIGIN, BASEREFSPEC) {
            BASEREFSPEC
        } else {
            REFSPEC
        };
        self.kf.set_string(ORIGIN, key, refspec.target());

        match custom {
            Some(custom) => {
                self.kf.set_string(ORIGIN, CUSTOM_URL, &custom.url);
                self.kf
                    .set_string(ORIGIN, CUSTOM_DESCRIPTION, &custom.description);
            }
            None => {
                self.kf.remove_key(ORIGIN, CUSTOM_URL);
                self.kf.remove_key(ORIGIN, CUSTOM_DESCRIPTION);
            }
        }
        self.custom_origin = custom.cloned();

        debug!("rebased from '{}' to '{}'", self.refspec, refspec);
        self.refspec_text = refspec.target().to_string();
        self.refspec = refspec;
        self.sync_refspec_key();
        Ok(())
    }

    /// Pin (or unpin, with `None`) a specific commit.
    ///
    /// A `version` is recorded only as a comment next to the checksum. No
    /// check is made against the refspec kind.
    pub fn set_override_commit(&mut self, checksum: Option<&str>, version: Option<&str>) {
        match checksum {
            Some(checksum) => {
                self.kf.set_string(ORIGIN, OVERRIDE_COMMIT, checksum);
                let comment = version.map(|version| {
                    let short = checksum.get(..10).unwrap_or(checksum);
                    format!("Version {version} [{short}]")
                });
                // A new checksum without a version drops the stale annotation
                self.kf
                    .set_comment(ORIGIN, OVERRIDE_COMMIT, comment.as_deref());
            }
            None => {
                self.kf.remove_key(ORIGIN, OVERRIDE_COMMIT);
            }
        }
        self.override_commit = checksum.map(str::to_string);
    }

    /// Strip per-deployment state so the origin can seed a new deployment.
    pub fn remove_transient_state(&mut self) {
        self.kf.remove_section(TRANSIENT_SECTION);
        self.set_override_commit(None, None);
    }
}

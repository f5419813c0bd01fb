//! Initramfs customization and the cliwrap toggle

use log::debug;

use super::{write_set, Origin, CLIWRAP, INITRAMFS_ARGS, INITRAMFS_ETC, REGENERATE_INITRAMFS, RPMOSTREE};

impl Origin {
    /// Track extra `/etc` files in the initramfs. Returns whether the set
    /// changed.
    pub fn track_etc_files<S: AsRef<str>>(&mut self, paths: &[S]) -> bool {
        let mut changed = false;
        for path in paths {
            changed |= self.initramfs_etc_files.insert(path.as_ref().to_string());
        }
        if changed {
            self.write_etc_files();
        }
        changed
    }

    /// Stop tracking `/etc` files. Returns whether the set changed.
    pub fn untrack_etc_files<S: AsRef<str>>(&mut self, paths: &[S]) -> bool {
        let mut changed = false;
        for path in paths {
            changed |= self.initramfs_etc_files.remove(path.as_ref());
        }
        if changed {
            self.write_etc_files();
        }
        changed
    }

    /// Stop tracking every `/etc` file. Returns whether the set changed.
    pub fn untrack_all_etc_files(&mut self) -> bool {
        let changed = !self.initramfs_etc_files.is_empty();
        self.initramfs_etc_files.clear();
        if changed {
            self.write_etc_files();
        }
        changed
    }

    /// Turn initramfs regeneration on or off.
    ///
    /// When enabling, non-empty `args` replace the stored arguments and empty
    /// `args` clear them. Disabling clears both the flag and the arguments.
    /// The cached arguments are always read back from the document afterwards.
    pub fn set_regenerate_initramfs<S: AsRef<str>>(&mut self, regenerate: bool, args: &[S]) {
        if regenerate {
            self.kf.set_boolean(RPMOSTREE, REGENERATE_INITRAMFS, true);
            if args.is_empty() {
                self.kf.remove_key(RPMOSTREE, INITRAMFS_ARGS);
            } else {
                self.kf.set_string_list(RPMOSTREE, INITRAMFS_ARGS, args);
            }
        } else {
            self.kf.remove_key(RPMOSTREE, REGENERATE_INITRAMFS);
            self.kf.remove_key(RPMOSTREE, INITRAMFS_ARGS);
        }

        self.regenerate_initramfs = self
            .kf
            .get_boolean(RPMOSTREE, REGENERATE_INITRAMFS)
            .unwrap_or(false);
        self.initramfs_args = self
            .kf
            .get_string_list(RPMOSTREE, INITRAMFS_ARGS)
            .unwrap_or_default();
        debug!(
            "initramfs regeneration {} (args: {:?})",
            if self.regenerate_initramfs { "enabled" } else { "disabled" },
            self.initramfs_args
        );
        self.sync_refspec_key();
    }

    /// Turn CLI wrapping on or off
    pub fn set_cliwrap(&mut self, cliwrap: bool) {
        if cliwrap {
            self.kf.set_boolean(RPMOSTREE, CLIWRAP, true);
        } else {
            self.kf.remove_key(RPMOSTREE, CLIWRAP);
        }
        self.cliwrap = cliwrap;
        self.sync_refspec_key();
    }

    fn write_etc_files(&mut self) {
        write_set(&mut self.kf, RPMOSTREE, INITRAMFS_ETC, &self.initramfs_etc_files);
        self.sync_refspec_key();
    }
}

//! Property-based tests for the origin cache and its key-file document.
//!
//! These tests use proptest to drive origins through random mutations and
//! check that the cache and the document never disagree.

#[cfg(test)]
mod proptest_tests {
    use crate::keyfile::KeyFile;
    use crate::origin::{CustomOrigin, Origin, OverrideKind};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const BASE: &str = "[origin]\nrefspec=exampleos:exampleos/x86_64/stable\n\
        unconfigured-state=Register first  \n";

    fn csum(digit: char) -> String {
        std::iter::repeat(digit).take(64).collect()
    }

    fn local_pkg(name: &str, digit: char) -> String {
        format!("{}:{name}-1.0-1.x86_64", csum(digit))
    }

    fn assert_same(a: &Origin, b: &Origin) -> Result<(), TestCaseError> {
        prop_assert_eq!(a.refspec(), b.refspec());
        prop_assert_eq!(a.override_commit(), b.override_commit());
        prop_assert_eq!(a.packages(), b.packages());
        prop_assert_eq!(a.local_packages(), b.local_packages());
        prop_assert_eq!(a.overrides_remove(), b.overrides_remove());
        prop_assert_eq!(a.overrides_local_replace(), b.overrides_local_replace());
        prop_assert_eq!(a.initramfs_etc_files(), b.initramfs_etc_files());
        prop_assert_eq!(a.initramfs_args(), b.initramfs_args());
        prop_assert_eq!(a.regenerate_initramfs(), b.regenerate_initramfs());
        prop_assert_eq!(a.cliwrap(), b.cliwrap());
        prop_assert_eq!(a.requires_local_assembly(), b.requires_local_assembly());
        prop_assert_eq!(a.refspec_key(), b.refspec_key());
        prop_assert_eq!(
            a.get_string("origin", a.refspec_key()),
            b.get_string("origin", b.refspec_key())
        );
        prop_assert_eq!(a.custom_origin(), b.custom_origin());
        prop_assert_eq!(a.unconfigured_state(), b.unconfigured_state());
        prop_assert_eq!(a.override_commit_annotation(), b.override_commit_annotation());
        Ok(())
    }

    /// One mutation step
    #[derive(Debug, Clone)]
    enum Op {
        AddRemote(String),
        AddLocal(String, char),
        RemovePackage(String),
        RemoveAllPackages,
        OverrideRemove(String),
        OverrideReplace(String, char),
        RemoveAllOverrides,
        Track(String),
        UntrackAll,
        Regenerate(bool, Vec<String>),
        Cliwrap(bool),
        Rebase(String),
        RebaseCustom(char, CustomOrigin),
        Pin(char, Option<String>),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let name = "[a-z]{1,6}";
        let digit = prop::sample::select(vec!['0', '7', 'a', 'f']);
        prop_oneof![
            prop_oneof![name, "[a-z]{1,3}-1\\.0-1\\.x86_64"].prop_map(Op::AddRemote),
            (name, digit.clone()).prop_map(|(n, d)| Op::AddLocal(n, d)),
            name.prop_map(Op::RemovePackage),
            Just(Op::RemoveAllPackages),
            name.prop_map(Op::OverrideRemove),
            (name, digit.clone()).prop_map(|(n, d)| Op::OverrideReplace(n, d)),
            Just(Op::RemoveAllOverrides),
            "/etc/[a-z]{1,6}".prop_map(Op::Track),
            Just(Op::UntrackAll),
            (any::<bool>(), prop::collection::vec("[a-zA-Z0-9 ;-]{0,6}", 0..3))
                .prop_map(|(on, args)| Op::Regenerate(on, args)),
            any::<bool>().prop_map(Op::Cliwrap),
            ("(ostree://)?", "[a-z]{1,4}:[a-z]{1,6}(/[a-z0-9]{1,4})?")
                .prop_map(|(scheme, branch)| Op::Rebase(format!("{scheme}{branch}"))),
            (
                digit.clone(),
                "[ ]{0,1}https://[a-z]{1,6}/[0-9]{1,3}[ ]{0,2}",
                "[ \t]{0,2}[A-Za-z0-9]{1,6}( [A-Za-z0-9]{1,4})?[ \t]{0,2}",
            )
                .prop_map(|(d, url, description)| {
                    Op::RebaseCustom(d, CustomOrigin::new(url, description))
                }),
            (digit, prop::option::of("[ ]{0,1}[0-9]{1,2}\\.[0-9][ ]{0,2}"))
                .prop_map(|(d, version)| Op::Pin(d, version)),
        ]
    }

    fn apply(origin: &mut Origin, op: &Op) {
        // Conflicts are expected here; only the resulting state matters
        match op {
            Op::AddRemote(name) => {
                let _ = origin.add_packages(&[name], false, true);
            }
            Op::AddLocal(name, digit) => {
                let _ = origin.add_packages(&[local_pkg(name, *digit)], true, true);
            }
            Op::RemovePackage(name) => {
                let _ = origin.remove_packages(&[name], true);
            }
            Op::RemoveAllPackages => {
                origin.remove_all_packages();
            }
            Op::OverrideRemove(name) => {
                let _ = origin.add_overrides(&[name], OverrideKind::RemoveBase);
            }
            Op::OverrideReplace(name, digit) => {
                let _ = origin.add_overrides(&[local_pkg(name, *digit)], OverrideKind::ReplaceLocal);
            }
            Op::RemoveAllOverrides => {
                origin.remove_all_overrides();
            }
            Op::Track(path) => {
                origin.track_etc_files(&[path]);
            }
            Op::UntrackAll => {
                origin.untrack_all_etc_files();
            }
            Op::Regenerate(on, args) => origin.set_regenerate_initramfs(*on, args),
            Op::Cliwrap(on) => origin.set_cliwrap(*on),
            Op::Rebase(refspec) => {
                let _ = origin.rebase(refspec);
            }
            Op::RebaseCustom(digit, custom) => {
                let _ = origin.rebase_custom(&csum(*digit), Some(custom));
            }
            Op::Pin(digit, version) => {
                origin.set_override_commit(Some(csum(*digit).as_str()), version.as_deref());
            }
        }
    }

    proptest! {
        /// Property: re-parsing the serialized document reproduces every accessor
        #[test]
        fn reparse_matches_cache(ops in prop::collection::vec(op_strategy(), 0..24)) {
            let mut origin = Origin::from_data(BASE).unwrap();
            for op in &ops {
                apply(&mut origin, op);
            }
            let reparsed = Origin::from_data(&origin.to_data()).unwrap();
            prop_assert_eq!(reparsed.unconfigured_state(), Some("Register first  "));
            assert_same(&origin, &reparsed)?;
            let duplicate = origin.duplicate().unwrap();
            assert_same(&origin, &duplicate)?;
        }

        /// Property: the refspec key always follows the assembly predicate
        #[test]
        fn refspec_key_follows_assembly(ops in prop::collection::vec(op_strategy(), 1..24)) {
            let mut origin = Origin::from_data(BASE).unwrap();
            for op in &ops {
                apply(&mut origin, op);
                let expected = if origin.requires_local_assembly() { "baserefspec" } else { "refspec" };
                prop_assert_eq!(origin.refspec_key(), expected);
                prop_assert!(!(origin.keyfile().has_key("origin", "refspec")
                    && origin.keyfile().has_key("origin", "baserefspec")));
            }
        }

        /// Property: remote requests never share a string with local requests
        #[test]
        fn requests_stay_disjoint(ops in prop::collection::vec(op_strategy(), 0..24)) {
            let mut origin = Origin::from_data(BASE).unwrap();
            for op in &ops {
                apply(&mut origin, op);
            }
            let local: BTreeSet<&String> = origin.local_packages().keys().collect();
            for remote in origin.packages() {
                prop_assert!(!local.contains(remote));
            }
        }

        /// Property: adding the same remote request twice with allow_existing
        /// changes the origin only once
        #[test]
        fn idempotent_add(name in "[a-z][a-z0-9.+-]{0,12}") {
            let mut origin = Origin::from_data(BASE).unwrap();
            prop_assert!(origin.add_packages(&[&name], false, true).unwrap());
            prop_assert!(!origin.add_packages(&[&name], false, true).unwrap());
            prop_assert_eq!(origin.packages().len(), 1);
        }

        /// Property: string lists survive a text round-trip
        #[test]
        fn string_list_round_trip(items in prop::collection::vec("[a-zA-Z0-9 ;/._\\\\-]{0,12}", 0..6)) {
            let mut kf = KeyFile::new();
            kf.set_string_list("rpmostree", "initramfs-args", &items);
            let reparsed = KeyFile::parse(&kf.to_data()).unwrap();
            prop_assert_eq!(reparsed.get_string_list("rpmostree", "initramfs-args").unwrap(), items);
        }
    }
}

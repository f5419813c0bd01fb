//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_origin(origins::BRANCH);
//!     fixture.command().arg("show").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::origins;
    #[allow(unused_imports)]
    pub use super::{checksum, local};
    pub use super::TestFixture;
}

/// Origin documents used across tests.
#[allow(dead_code)]
pub mod origins {
    /// Plain branch origin with nothing layered.
    pub const BRANCH: &str = "[origin]\nrefspec=fedora:fedora/36/x86_64/silverblue\n";

    /// Branch origin with one layered package.
    pub const LAYERED: &str = "[origin]\nbaserefspec=fedora:fedora/36/x86_64/silverblue\n\n\
        [packages]\nrequested=vim-enhanced;\n";

    /// Origin with a pinned commit and per-deployment state.
    pub const TRANSIENT: &str = "[origin]\nrefspec=fedora:fedora/36/x86_64/silverblue\n\
        #Version 36.20220101.0 [aaaaaaaaaa]\n\
        override-commit=aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n\n\
        [libostree-transient]\nstaged=true\n";

    /// Not an origin at all.
    pub const NO_REFSPEC: &str = "[packages]\nrequested=vim;\n";
}

/// A 64-character checksum made of one repeated hex digit.
#[allow(dead_code)]
pub fn checksum(digit: char) -> String {
    std::iter::repeat(digit).take(64).collect()
}

/// A `sha256:NEVRA` local package string.
#[allow(dead_code)]
pub fn local(digit: char, nevra: &str) -> String {
    format!("{}:{}", checksum(digit), nevra)
}

/// A temporary directory holding an `origin` file.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write the origin file with the given content.
    pub fn with_origin(self, content: &str) -> Self {
        self.temp_dir
            .child("deploy.origin")
            .write_str(content)
            .expect("Failed to write origin file");
        self
    }

    /// Get the path to the temporary directory.
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the origin file.
    pub fn origin_path(&self) -> PathBuf {
        self.temp_dir.path().join("deploy.origin")
    }

    /// Current contents of the origin file.
    #[allow(dead_code)]
    pub fn read_origin(&self) -> String {
        std::fs::read_to_string(self.origin_path()).expect("Failed to read origin file")
    }

    /// A command pointed at this fixture's origin file, with colors off.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("deploy-origin");
        cmd.current_dir(self.path())
            .env_remove("DEPLOY_ORIGIN_FILE")
            .env_remove("RUST_LOG")
            .arg("--color=never")
            .arg("--origin")
            .arg(self.origin_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_origin() {
        let fixture = TestFixture::new().with_origin(origins::BRANCH);
        assert!(fixture.origin_path().exists());
        assert_eq!(fixture.read_origin(), origins::BRANCH);
    }

    #[test]
    fn test_checksum_length() {
        assert_eq!(checksum('a').len(), 64);
        assert!(local('b', "foo-1.0-1.x86_64").ends_with(":foo-1.0-1.x86_64"));
    }
}

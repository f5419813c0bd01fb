//! Package identifier decomposition
//!
//! Local packages are recorded as NEVRA strings
//! (`name-[epoch:]version-release.arch`), optionally prefixed with the
//! SHA-256 of their header as `<sha256>:<nevra>`. These helpers split those
//! strings apart; they never look anything up.

use crate::error::{Error, Result};

/// Length of a hex-encoded SHA-256 digest
pub const SHA256_HEX_LEN: usize = 64;

/// A decomposed NEVRA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nevra {
    pub name: String,
    pub epoch: Option<u64>,
    pub version: String,
    pub release: String,
    pub arch: String,
}

/// Split a NEVRA into its parts.
///
/// # Examples
///
/// ```
/// use deploy_origin::nevra::decompose_nevra;
///
/// let nevra = decompose_nevra("vim-enhanced-2:9.0.1-1.fc36.x86_64").unwrap();
/// assert_eq!(nevra.name, "vim-enhanced");
/// assert_eq!(nevra.epoch, Some(2));
/// assert_eq!(nevra.version, "9.0.1");
/// assert_eq!(nevra.release, "1.fc36");
/// assert_eq!(nevra.arch, "x86_64");
/// ```
pub fn decompose_nevra(nevra: &str) -> Result<Nevra> {
    let invalid = |message: &str| Error::InvalidPackageEncoding {
        input: nevra.to_string(),
        message: message.to_string(),
    };

    let (rest, arch) = nevra
        .rsplit_once('.')
        .ok_or_else(|| invalid("missing architecture"))?;
    let (rest, release) = rest
        .rsplit_once('-')
        .ok_or_else(|| invalid("missing release"))?;
    let (name, epoch_version) = rest
        .rsplit_once('-')
        .ok_or_else(|| invalid("missing version"))?;

    let (epoch, version) = match epoch_version.split_once(':') {
        Some((epoch, version)) => {
            let epoch = epoch
                .parse::<u64>()
                .map_err(|_| invalid("epoch is not a number"))?;
            (Some(epoch), version)
        }
        None => (None, epoch_version),
    };

    if name.is_empty() || version.is_empty() || release.is_empty() || arch.is_empty() {
        return Err(invalid("empty name, version, release or architecture"));
    }

    Ok(Nevra {
        name: name.to_string(),
        epoch,
        version: version.to_string(),
        release: release.to_string(),
        arch: arch.to_string(),
    })
}

/// Split `<sha256>:<nevra>` into `(nevra, sha256)`.
///
/// The NEVRA part is validated with [`decompose_nevra`].
///
/// ```
/// use deploy_origin::nevra::decompose_sha256_nevra;
///
/// let csum = "a".repeat(64);
/// let (nevra, sha256) = decompose_sha256_nevra(&format!("{csum}:foo-1.0-1.noarch")).unwrap();
/// assert_eq!(nevra, "foo-1.0-1.noarch");
/// assert_eq!(sha256, csum);
/// ```
pub fn decompose_sha256_nevra(input: &str) -> Result<(String, String)> {
    let invalid = |message: &str| Error::InvalidPackageEncoding {
        input: input.to_string(),
        message: message.to_string(),
    };

    let (sha256, nevra) = input
        .split_once(':')
        .ok_or_else(|| invalid("expected <sha256>:<nevra>"))?;
    if !is_sha256(sha256) {
        return Err(invalid("invalid SHA-256 checksum"));
    }
    decompose_nevra(nevra).map_err(|_| invalid("invalid NEVRA"))?;

    Ok((nevra.to_string(), sha256.to_string()))
}

/// Bare package name of a NEVRA
pub fn package_name(nevra: &str) -> Result<String> {
    decompose_nevra(nevra).map(|n| n.name)
}

/// Whether `s` is a lowercase hex SHA-256 digest
pub fn is_sha256(s: &str) -> bool {
    s.len() == SHA256_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where a case writes its record.

use crate::errors::ConfigError;
use camino::{Utf8Path, Utf8PathBuf};

/// The suffix stripped from, and restored to, derived per-case paths.
pub const RECORD_SUFFIX: &str = ".txt";

/// Which file a case records into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordTarget {
    /// Write directly to the base path.
    Shared,

    /// Write to a path derived from the base path and the case name, see
    /// [`derive_case_path`].
    PerCase,
}

impl RecordTarget {
    /// Resolves the target against a base path.
    pub fn resolve(
        self,
        base: &Utf8Path,
        discriminator: &str,
    ) -> Result<Utf8PathBuf, ConfigError> {
        match self {
            Self::Shared => Ok(base.to_path_buf()),
            Self::PerCase => derive_case_path(base, discriminator),
        }
    }
}

/// Derives a per-case record path.
///
/// A trailing [`RECORD_SUFFIX`] is stripped from `base`, then `_`, the
/// discriminator and the suffix are appended. A base without the suffix keeps
/// its full name:
///
/// ```
/// use apitest_recorder::record::derive_case_path;
///
/// assert_eq!(derive_case_path("out.txt".as_ref(), "Foo").unwrap(), "out_Foo.txt");
/// assert_eq!(derive_case_path("out.log".as_ref(), "Foo").unwrap(), "out.log_Foo.txt");
/// ```
pub fn derive_case_path(base: &Utf8Path, discriminator: &str) -> Result<Utf8PathBuf, ConfigError> {
    if discriminator.is_empty() || discriminator.contains(['/', '\\']) {
        return Err(ConfigError::InvalidDiscriminator {
            discriminator: discriminator.to_owned(),
        });
    }

    let base = base.as_str();
    let stem = base.strip_suffix(RECORD_SUFFIX).unwrap_or(base);
    Ok(Utf8PathBuf::from(format!(
        "{stem}_{discriminator}{RECORD_SUFFIX}"
    )))
}

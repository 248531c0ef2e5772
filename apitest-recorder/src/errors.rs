// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the recorder.
//!
//! There are three families:
//!
//! - [`ConfigError`]: the run is misconfigured (no output path, bad names).
//! - [`RecordError`]: reading or writing a record file failed.
//! - [`UsageError`]: a [`RecordFile`](crate::record::RecordFile) was driven out
//!   of order. These are defects in the calling test code.

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error in the configuration of a recording run.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The shared output path was read before it was initialized.
    #[error("output base path is not configured (pass --output or set APITEST_OUTPUT)")]
    Unconfigured,

    /// An empty output path was supplied.
    #[error("output base path must not be empty")]
    EmptyPath,

    /// The shared output path was initialized twice.
    #[error("output base path is already initialized to `{current}`")]
    AlreadyInitialized {
        /// The value that is already set.
        current: Utf8PathBuf,
    },

    /// A per-case discriminator cannot be used in a file name.
    #[error("invalid case discriminator `{discriminator}`: must be non-empty and contain no path separators")]
    InvalidDiscriminator {
        /// The rejected discriminator.
        discriminator: String,
    },

    /// A thread count of zero was requested.
    #[error("test thread count must be at least 1")]
    InvalidThreadCount,
}

/// An error that occurred while creating, writing or reading a record file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    /// The temporary file backing a record could not be created.
    #[error("error creating record file for `{path}`")]
    Create {
        /// The target path of the record.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Writing or syncing the record contents failed.
    #[error("error writing record file `{path}`")]
    Write {
        /// The target path of the record.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Moving the finished record into place failed.
    #[error("error persisting record file to `{path}`")]
    Persist {
        /// The target path of the record.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Reading a record back failed.
    #[error("error reading record file `{path}`")]
    Read {
        /// The path that was read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The record file was used out of order.
    #[error("misuse of record file `{path}`")]
    Usage {
        /// The target path of the record.
        path: Utf8PathBuf,

        /// What went wrong.
        #[source]
        error: UsageError,
    },
}

impl RecordError {
    /// Returns the usage error, if this is one.
    pub fn as_usage(&self) -> Option<&UsageError> {
        match self {
            Self::Usage { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// A [`RecordFile`](crate::record::RecordFile) operation was called in a state
/// that does not allow it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum UsageError {
    /// `record` or `save` was called before `create`.
    #[error("record file was not created")]
    NotCreated,

    /// `create` was called a second time.
    #[error("record file was already created")]
    AlreadyCreated,

    /// `record` was called after `save`.
    #[error("record file was already saved")]
    Finalized,

    /// `record` or `save` was called after a `save` that failed. The record was
    /// discarded.
    #[error("an earlier save of this record file failed; its contents were discarded")]
    SaveFailed,

    /// A textual token would not survive whitespace tokenization.
    #[error("invalid token {token:?}: must be non-empty and contain no whitespace")]
    InvalidToken {
        /// The rejected token.
        token: String,
    },
}

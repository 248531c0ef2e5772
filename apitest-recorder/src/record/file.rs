// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::token::Token;
use crate::errors::{RecordError, UsageError};
use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::{Builder, NamedUtf8TempFile};
use std::io::Write;

/// The separator written after every token, including the last one.
pub const TOKEN_SEPARATOR: char = ' ';

/// A per-case record of observed values.
///
/// The lifecycle is `Unopened -> Open -> Finalized`, or `Open -> Failed` when
/// `save` does not complete:
///
/// 1. [`new`](Self::new) binds the record to a path without touching the file
///    system.
/// 2. [`create`](Self::create) reserves a temporary file in the target's
///    directory. Nothing is visible at the target path yet.
/// 3. [`record`](Self::record) buffers tokens in memory.
/// 4. [`save`](Self::save) writes the buffer to the temporary file, syncs it,
///    and renames it over the target path.
///
/// A failed `save` discards the record. Later calls report
/// [`UsageError::SaveFailed`] so the failure cannot be mistaken for success.
///
/// If a `RecordFile` is dropped while open (for example because the case
/// returned early or panicked), the temporary file is removed and the target
/// path is left as it was.
#[derive(Debug)]
pub struct RecordFile {
    path: Utf8PathBuf,
    state: RecordState,
    pending: String,
    token_count: usize,
}

#[derive(Debug)]
enum RecordState {
    Unopened,
    Open(NamedUtf8TempFile),
    Finalized,
    Failed,
}

impl RecordFile {
    /// Binds a record to `path`. Performs no I/O.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: RecordState::Unopened,
            pending: String::new(),
            token_count: 0,
        }
    }

    /// Binds a record to `path` and creates it.
    pub fn create_at(path: impl Into<Utf8PathBuf>) -> Result<Self, RecordError> {
        let mut file = Self::new(path);
        file.create()?;
        Ok(file)
    }

    /// The target path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns true between `create` and `save`.
    pub fn is_open(&self) -> bool {
        matches!(self.state, RecordState::Open(_))
    }

    /// Returns true once `save` has succeeded.
    pub fn is_finalized(&self) -> bool {
        matches!(self.state, RecordState::Finalized)
    }

    /// The buffered contents that `save` will write.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// The number of tokens recorded so far.
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Opens the record for writing.
    ///
    /// Any existing file at the target path is replaced by `save`. Fails if the
    /// target directory does not exist or is not writable.
    pub fn create(&mut self) -> Result<(), RecordError> {
        match self.state {
            RecordState::Unopened => {}
            RecordState::Open(_) | RecordState::Finalized | RecordState::Failed => {
                return Err(self.usage(UsageError::AlreadyCreated));
            }
        }

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let mut builder = Builder::new();
        builder.prefix(".record");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Temporary files default to 0600. Records get the mode of an
            // ordinary create, subject to the umask.
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let temp = builder.tempfile_in(dir).map_err(|error| RecordError::Create {
            path: self.path.clone(),
            error,
        })?;

        tracing::debug!(path = %self.path, temp = %temp.path(), "created record file");
        self.state = RecordState::Open(temp);
        Ok(())
    }

    /// Appends a token followed by [`TOKEN_SEPARATOR`].
    ///
    /// Returns `self` so that calls chain:
    ///
    /// ```no_run
    /// # use apitest_recorder::{errors::RecordError, record::RecordFile};
    /// # fn main() -> Result<(), RecordError> {
    /// let mut file = RecordFile::create_at("out.txt")?;
    /// file.record(3_i64)?.record(true)?.record(0.5_f32)?;
    /// file.save()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn record(&mut self, value: impl Token) -> Result<&mut Self, RecordError> {
        match self.state {
            RecordState::Open(_) => {}
            RecordState::Unopened => return Err(self.usage(UsageError::NotCreated)),
            RecordState::Finalized => return Err(self.usage(UsageError::Finalized)),
            RecordState::Failed => return Err(self.usage(UsageError::SaveFailed)),
        }

        let start = self.pending.len();
        if let Err(error) = value.write_token(&mut self.pending) {
            self.pending.truncate(start);
            return Err(self.usage(error));
        }
        self.pending.push(TOKEN_SEPARATOR);
        self.token_count += 1;
        Ok(self)
    }

    /// Appends every value in `values`, in order.
    pub fn record_all<I>(&mut self, values: I) -> Result<&mut Self, RecordError>
    where
        I: IntoIterator,
        I::Item: Token,
    {
        for value in values {
            self.record(value)?;
        }
        Ok(self)
    }

    /// Writes the record and makes it visible at the target path.
    ///
    /// Saving an already-saved record is a no-op. Saving again after a failed
    /// save returns [`UsageError::SaveFailed`].
    pub fn save(&mut self) -> Result<(), RecordError> {
        let temp = match std::mem::replace(&mut self.state, RecordState::Failed) {
            RecordState::Open(temp) => temp,
            RecordState::Finalized => {
                self.state = RecordState::Finalized;
                tracing::debug!(path = %self.path, "record file already saved");
                return Ok(());
            }
            RecordState::Unopened => {
                self.state = RecordState::Unopened;
                return Err(self.usage(UsageError::NotCreated));
            }
            RecordState::Failed => return Err(self.usage(UsageError::SaveFailed)),
        };

        // On any failure below `temp` is dropped, which deletes it, and the
        // state stays `Failed`.
        let write_err = |error: std::io::Error| RecordError::Write {
            path: self.path.clone(),
            error,
        };
        let mut handle = temp.as_file();
        handle.write_all(self.pending.as_bytes()).map_err(write_err)?;
        handle.flush().map_err(write_err)?;
        handle.sync_all().map_err(write_err)?;

        temp.persist(&self.path)
            .map_err(|error| RecordError::Persist {
                path: self.path.clone(),
                error: error.error,
            })?;

        tracing::debug!(
            path = %self.path,
            tokens = self.token_count,
            bytes = self.pending.len(),
            "saved record file",
        );
        self.state = RecordState::Finalized;
        Ok(())
    }

    fn usage(&self, error: UsageError) -> RecordError {
        RecordError::Usage {
            path: self.path.clone(),
            error,
        }
    }
}

impl Drop for RecordFile {
    fn drop(&mut self) {
        if let RecordState::Open(_) = self.state {
            // The temporary file is removed when the state is dropped.
            tracing::warn!(
                path = %self.path,
                tokens = self.token_count,
                "record file dropped without being saved; discarding",
            );
        }
    }
}

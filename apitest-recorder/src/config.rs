// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run configuration: resolves the output path, worker count and file naming
//! in a single place.

use crate::errors::ConfigError;
use camino::Utf8PathBuf;
use std::num::NonZeroUsize;

/// Unresolved run configuration, as collected from the command line and
/// environment.
#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    /// The output base path (`--output` / `APITEST_OUTPUT`).
    pub output: Option<Utf8PathBuf>,

    /// Explicit worker count (`--test-threads`), or `None` to use the available
    /// parallelism.
    pub test_threads: Option<usize>,

    /// Write every case to its own file (`--per-case`).
    pub per_case: bool,
}

/// The fully resolved run decisions.
///
/// Produced by [`RunConfig::resolve()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRun {
    /// The base path every case derives its record path from.
    pub base_path: Utf8PathBuf,

    /// The number of cases run concurrently.
    pub threads: NonZeroUsize,

    /// How case targets map to files.
    pub naming: NamingPolicy,
}

/// How declared record targets are honored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamingPolicy {
    /// Each case writes where it declared.
    AsDeclared,

    /// Every case writes to its own derived file, whatever it declared.
    ForcePerCase,
}

impl RunConfig {
    /// Resolves this configuration.
    ///
    /// `available_parallelism` is passed in (rather than queried) for
    /// testability. `shared_cases` is the number of selected cases that
    /// declare the shared base path as their target.
    ///
    /// | `test_threads` | `per_case` | `shared_cases` | threads                 | naming                                    |
    /// |----------------|------------|----------------|-------------------------|-------------------------------------------|
    /// | `None`         | false      | 0 or 1         | `available_parallelism` | `ForcePerCase` if > 1, else `AsDeclared`  |
    /// | `Some(1)`      | false      | 0 or 1         | 1                       | `AsDeclared`                              |
    /// | `Some(n > 1)`  | false      | any            | n                       | `ForcePerCase`                            |
    /// | any            | false      | > 1            | as above                | `ForcePerCase`                            |
    /// | any            | true       | any            | as above                | `ForcePerCase`                            |
    /// | `Some(0)`      | any        | any            | error                   |                                           |
    pub fn resolve(
        &self,
        available_parallelism: NonZeroUsize,
        shared_cases: usize,
    ) -> Result<ResolvedRun, ConfigError> {
        let base_path = match &self.output {
            Some(path) if path.as_str().is_empty() => return Err(ConfigError::EmptyPath),
            Some(path) => path.clone(),
            None => return Err(ConfigError::Unconfigured),
        };

        let threads = match self.test_threads {
            Some(n) => NonZeroUsize::new(n).ok_or(ConfigError::InvalidThreadCount)?,
            None => available_parallelism,
        };

        // Cases that share the base path replace each other's records: each
        // write is atomic, but only the last one survives.
        let naming = if self.per_case || threads.get() > 1 || shared_cases > 1 {
            if !self.per_case {
                tracing::debug!(
                    threads = threads.get(),
                    shared_cases,
                    "several cases would share the base path; writing every case to its own record file",
                );
            }
            NamingPolicy::ForcePerCase
        } else {
            NamingPolicy::AsDeclared
        };

        Ok(ResolvedRun {
            base_path,
            threads,
            naming,
        })
    }
}

// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The output base path shared by every case in a run.

use crate::errors::ConfigError;
use camino::{Utf8Path, Utf8PathBuf};
use std::sync::OnceLock;

static GLOBAL: SharedRunParam = SharedRunParam::new();

/// A write-once, read-many holder for the output base path.
///
/// The value is set exactly once, normally by the process entry point before
/// any case runs, and is then read concurrently by cases. Reads never block
/// and always observe either "unset" or the complete value.
///
/// Reconfiguration is not supported: a second [`initialize`](Self::initialize)
/// fails with [`ConfigError::AlreadyInitialized`].
#[derive(Debug, Default)]
pub struct SharedRunParam {
    value: OnceLock<Utf8PathBuf>,
}

impl SharedRunParam {
    /// Creates an uninitialized parameter.
    pub const fn new() -> Self {
        Self {
            value: OnceLock::new(),
        }
    }

    /// Returns the process-wide instance.
    ///
    /// Only the binary entry point should reach for this; everything else takes
    /// a `&SharedRunParam` so it can be exercised with a local instance.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Sets the base path.
    pub fn initialize(&self, value: impl Into<Utf8PathBuf>) -> Result<(), ConfigError> {
        let value = value.into();
        if value.as_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        let mut inserted = false;
        let current = self.value.get_or_init(|| {
            inserted = true;
            value
        });
        if inserted {
            tracing::debug!(base_path = %current, "output base path initialized");
            Ok(())
        } else {
            Err(ConfigError::AlreadyInitialized {
                current: current.clone(),
            })
        }
    }

    /// Returns a copy of the base path.
    pub fn get(&self) -> Result<Utf8PathBuf, ConfigError> {
        self.try_get()
            .map(Utf8Path::to_path_buf)
            .ok_or(ConfigError::Unconfigured)
    }

    /// Returns the base path, or `None` if it has not been initialized.
    pub fn try_get(&self) -> Option<&Utf8Path> {
        self.value.get().map(Utf8PathBuf::as_path)
    }

    /// Returns true if [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.value.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    #[test]
    fn get_before_initialize_is_unconfigured() {
        let param = SharedRunParam::new();
        assert_eq!(param.get(), Err(ConfigError::Unconfigured));
        assert_eq!(param.try_get(), None);
        assert!(!param.is_initialized());
    }

    #[test]
    fn initialize_then_get() {
        let param = SharedRunParam::new();
        param.initialize("run.txt").unwrap();
        assert_eq!(param.get().unwrap(), "run.txt");
        assert!(param.is_initialized());
    }

    #[test]
    fn empty_path_is_rejected() {
        let param = SharedRunParam::new();
        assert_eq!(param.initialize(""), Err(ConfigError::EmptyPath));
        assert!(!param.is_initialized());

        // A rejected value does not consume the one-time initialization.
        param.initialize("out.txt").unwrap();
    }

    #[test]
    fn second_initialize_keeps_first_value() {
        let param = SharedRunParam::new();
        param.initialize("first.txt").unwrap();
        assert_eq!(
            param.initialize("second.txt"),
            Err(ConfigError::AlreadyInitialized {
                current: "first.txt".into()
            })
        );
        assert_eq!(param.get().unwrap(), "first.txt");
    }

    #[test]
    fn concurrent_readers_observe_the_initialized_value() {
        const READERS: usize = 16;

        let param = SharedRunParam::new();
        param.initialize("X").unwrap();
        let barrier = Barrier::new(READERS);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..READERS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        (0..1000)
                            .map(|_| param.get().unwrap())
                            .all(|value| value == "X")
                    })
                })
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap(), "every read observes X");
            }
        });
    }

    #[test]
    fn racing_initializers_elect_one_winner() {
        let param = SharedRunParam::new();
        let barrier = Barrier::new(8);

        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let param = &param;
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        param.initialize(format!("out{i}.txt"))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let winner = param.get().unwrap();
        for result in results.into_iter().filter_map(Result::err) {
            assert_eq!(
                result,
                ConfigError::AlreadyInitialized {
                    current: winner.clone()
                }
            );
        }
    }
}

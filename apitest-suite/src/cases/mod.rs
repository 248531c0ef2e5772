// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The registered cases.
//!
//! Each case builds its inputs, calls into `ndarray`, and records what it
//! observes. Cases never decide whether an observation is correct: that is the
//! job of the golden-file comparison that runs afterwards.

mod element;
mod layout;
mod scalar_type;
mod storage;
mod tensor;

pub use element::{element_facts, ElementFacts, ElementKind, ScalarKind};

use apitest_recorder::{
    config::NamingPolicy,
    errors::{ConfigError, RecordError},
    record::{RecordFile, RecordTarget},
    SharedRunParam,
};
use camino::Utf8PathBuf;
use ndarray::{Array, Ix3};
use std::fmt;
use thiserror::Error;

/// The signature of a case body.
pub type CaseFn = fn(&CaseContext<'_>) -> Result<(), CaseError>;

/// A registered case.
#[derive(Clone, Copy)]
pub struct Case {
    /// The suite the case belongs to, e.g. `layout`.
    pub suite: &'static str,

    /// The case name, unique across all suites. Used as the discriminator for
    /// per-case record files.
    pub name: &'static str,

    /// Where the case records by default.
    pub target: RecordTarget,

    /// The case body.
    pub run: CaseFn,
}

impl Case {
    const fn shared(suite: &'static str, name: &'static str, run: CaseFn) -> Self {
        Self {
            suite,
            name,
            target: RecordTarget::Shared,
            run,
        }
    }

    const fn per_case(suite: &'static str, name: &'static str, run: CaseFn) -> Self {
        Self {
            suite,
            name,
            target: RecordTarget::PerCase,
            run,
        }
    }

    /// `suite::name`, as used by filters and reports.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Everything a case body needs from the run.
#[derive(Debug)]
pub struct CaseContext<'a> {
    case: &'a Case,
    param: &'a SharedRunParam,
    naming: NamingPolicy,
}

impl<'a> CaseContext<'a> {
    /// Creates a context for `case`.
    pub fn new(case: &'a Case, param: &'a SharedRunParam, naming: NamingPolicy) -> Self {
        Self {
            case,
            param,
            naming,
        }
    }

    /// The case being run.
    pub fn case(&self) -> &Case {
        self.case
    }

    /// The target this case records into under the current naming policy.
    pub fn effective_target(&self) -> RecordTarget {
        match self.naming {
            NamingPolicy::AsDeclared => self.case.target,
            NamingPolicy::ForcePerCase => RecordTarget::PerCase,
        }
    }

    /// The path this case records into.
    pub fn record_path(&self) -> Result<Utf8PathBuf, ConfigError> {
        let base = self.param.get()?;
        self.effective_target().resolve(&base, self.case.name)
    }

    /// Opens this case's record file.
    pub fn open_record(&self) -> Result<RecordFile, CaseError> {
        let path = self.record_path()?;
        Ok(RecordFile::create_at(path)?)
    }
}

/// An error that fails a case.
#[derive(Debug, Error)]
pub enum CaseError {
    /// The run is misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The record could not be written.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// The library rejected a shape.
    #[error("shape error")]
    Shape(#[from] ndarray::ShapeError),

    /// An invariant the case depends on did not hold.
    #[error("{what}: expected {expected}, observed {observed}")]
    Expectation {
        /// What was checked.
        what: &'static str,
        /// The expected value.
        expected: String,
        /// The observed value.
        observed: String,
    },
}

/// Fails the case unless `observed == expected`.
pub(crate) fn ensure_eq<T>(what: &'static str, expected: T, observed: T) -> Result<(), CaseError>
where
    T: PartialEq + fmt::Debug,
{
    if expected == observed {
        Ok(())
    } else {
        Err(CaseError::Expectation {
            what,
            expected: format!("{expected:?}"),
            observed: format!("{observed:?}"),
        })
    }
}

/// The shape every case starts from.
pub const FIXTURE_SHAPE: (usize, usize, usize) = (2, 3, 4);

/// A fresh `f32` tensor of ones with [`FIXTURE_SHAPE`].
pub fn fixture() -> Array<f32, Ix3> {
    Array::ones(FIXTURE_SHAPE)
}

/// Every registered case, grouped by suite.
pub fn all() -> Vec<Case> {
    [
        layout::CASES,
        scalar_type::CASES,
        storage::CASES,
        tensor::CASES,
    ]
    .concat()
}

/// The number of `cases` that record into the shared base path by default.
pub fn shared_count(cases: &[Case]) -> usize {
    cases
        .iter()
        .filter(|case| case.target == RecordTarget::Shared)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn case_names_are_unique() {
        let cases = all();
        let names: HashSet<_> = cases.iter().map(|case| case.name).collect();
        assert_eq!(names.len(), cases.len(), "per-case files would collide");
    }

    #[test]
    fn every_suite_is_registered() {
        let suites: HashSet<_> = all().iter().map(|case| case.suite).collect();
        for suite in ["layout", "scalar_type", "storage", "tensor"] {
            assert!(suites.contains(suite), "missing suite {suite}");
        }
    }

    #[test]
    fn shared_count_ignores_per_case_targets() {
        let cases = all();
        let per_case = cases
            .iter()
            .filter(|case| case.target == RecordTarget::PerCase)
            .count();
        assert!(per_case > 0);
        assert_eq!(shared_count(&cases), cases.len() - per_case);
        assert_eq!(shared_count(&[]), 0);
    }

    #[test]
    fn context_resolves_declared_and_forced_targets() {
        let param = SharedRunParam::new();
        param.initialize("run.txt").unwrap();
        let case = Case::shared("layout", "Layout", |_| Ok(()));

        let cx = CaseContext::new(&case, &param, NamingPolicy::AsDeclared);
        assert_eq!(cx.record_path().unwrap(), "run.txt");

        let cx = CaseContext::new(&case, &param, NamingPolicy::ForcePerCase);
        assert_eq!(cx.record_path().unwrap(), "run_Layout.txt");

        let case = Case::per_case("tensor", "ViewResult", |_| Ok(()));
        let cx = CaseContext::new(&case, &param, NamingPolicy::AsDeclared);
        assert_eq!(cx.record_path().unwrap(), "run_ViewResult.txt");
    }

    #[test]
    fn context_without_base_path_is_unconfigured() {
        let param = SharedRunParam::new();
        let case = Case::shared("layout", "Layout", |_| Ok(()));
        let cx = CaseContext::new(&case, &param, NamingPolicy::AsDeclared);
        assert!(matches!(
            cx.open_record(),
            Err(CaseError::Config(ConfigError::Unconfigured))
        ));
    }

    #[test]
    fn ensure_eq_reports_both_sides() {
        assert!(ensure_eq("ndim", 3, 3).is_ok());
        let err = ensure_eq("ndim", 3, 2).unwrap_err();
        assert_eq!(err.to_string(), "ndim: expected 3, observed 2");
    }
}

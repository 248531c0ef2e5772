// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runs cases concurrently and collects their outcomes.

use crate::cases::{Case, CaseContext, CaseError};
use apitest_recorder::{config::NamingPolicy, SharedRunParam};
use camino::Utf8PathBuf;
use rayon::prelude::*;
use std::{
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    time::{Duration, Instant},
};
use thiserror::Error;

/// An error that prevented the run from starting.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The worker pool could not be built.
    #[error("failed to build worker pool with {threads} threads")]
    ThreadPool {
        /// The requested worker count.
        threads: NonZeroUsize,

        /// The underlying error.
        #[source]
        error: rayon::ThreadPoolBuildError,
    },
}

/// How a single case ended.
#[derive(Debug)]
pub enum CaseResult {
    /// The case returned `Ok` and saved its record.
    Passed,

    /// The case returned an error.
    Failed(CaseError),

    /// The case panicked; holds the panic message.
    Panicked(String),
}

impl CaseResult {
    /// Returns true if the case passed.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// The outcome of one case.
#[derive(Debug)]
pub struct CaseOutcome {
    /// The case that ran.
    pub case: Case,

    /// The record path, if it could be resolved.
    pub path: Option<Utf8PathBuf>,

    /// Wall-clock time spent in the case body.
    pub elapsed: Duration,

    /// How the case ended.
    pub result: CaseResult,
}

/// Outcomes of a run, in registration order.
#[derive(Debug)]
pub struct RunSummary {
    /// One outcome per case, in the order the cases were passed in.
    pub outcomes: Vec<CaseOutcome>,
}

impl RunSummary {
    /// The number of cases that passed.
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_success()).count()
    }

    /// Outcomes of cases that failed or panicked.
    pub fn failed(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.result.is_success())
    }

    /// Returns true if no case failed.
    pub fn all_passed(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Runs `cases` on `threads` workers.
pub fn run_cases(
    cases: &[Case],
    param: &SharedRunParam,
    threads: NonZeroUsize,
    naming: NamingPolicy,
) -> Result<RunSummary, RunnerError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.get())
        .thread_name(|index| format!("apitest-worker-{index}"))
        .build()
        .map_err(|error| RunnerError::ThreadPool { threads, error })?;

    tracing::debug!(
        cases = cases.len(),
        threads = threads.get(),
        ?naming,
        "starting run"
    );

    let outcomes: Vec<_> = pool.install(|| {
        cases
            .par_iter()
            .map(|case| run_case(case, param, naming))
            .collect()
    });
    Ok(RunSummary { outcomes })
}

/// Runs a single case on the current thread.
pub fn run_case(case: &Case, param: &SharedRunParam, naming: NamingPolicy) -> CaseOutcome {
    let cx = CaseContext::new(case, param, naming);
    let path = cx.record_path().ok();
    let start = Instant::now();

    // A panicking case drops its record file while unwinding, so no partial
    // record is left behind.
    let result = match panic::catch_unwind(AssertUnwindSafe(|| (case.run)(&cx))) {
        Ok(Ok(())) => CaseResult::Passed,
        Ok(Err(error)) => CaseResult::Failed(error),
        Err(payload) => CaseResult::Panicked(panic_message(payload.as_ref())),
    };
    let elapsed = start.elapsed();

    match &result {
        CaseResult::Passed => {
            tracing::debug!(case = %case.qualified_name(), ?elapsed, "case passed");
        }
        CaseResult::Failed(error) => {
            tracing::warn!(case = %case.qualified_name(), %error, "case failed");
        }
        CaseResult::Panicked(message) => {
            tracing::warn!(case = %case.qualified_name(), %message, "case panicked");
        }
    }

    CaseOutcome {
        case: *case,
        path,
        elapsed,
        result,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apitest_recorder::{errors::ConfigError, record::RecordTarget};
    use camino_tempfile::Utf8TempDir;

    fn passing(cx: &CaseContext<'_>) -> Result<(), CaseError> {
        let mut file = cx.open_record()?;
        file.record(1_i32)?;
        file.save()?;
        Ok(())
    }

    fn panicking(cx: &CaseContext<'_>) -> Result<(), CaseError> {
        let mut file = cx.open_record()?;
        file.record(1_i32)?;
        panic!("boom");
    }

    fn case(name: &'static str, run: crate::cases::CaseFn) -> Case {
        Case {
            suite: "runner",
            name,
            target: RecordTarget::PerCase,
            run,
        }
    }

    #[test]
    fn outcomes_keep_registration_order() {
        let dir = Utf8TempDir::new().unwrap();
        let param = SharedRunParam::new();
        param.initialize(dir.path().join("run.txt")).unwrap();

        let cases = [
            case("First", passing),
            case("Second", panicking),
            case("Third", passing),
        ];
        let summary = run_cases(
            &cases,
            &param,
            NonZeroUsize::new(3).unwrap(),
            NamingPolicy::AsDeclared,
        )
        .unwrap();

        let names: Vec<_> = summary.outcomes.iter().map(|o| o.case.name).collect();
        assert_eq!(names, ["First", "Second", "Third"]);
        assert_eq!(summary.passed(), 2);
        assert!(!summary.all_passed());

        let failed: Vec<_> = summary.failed().collect();
        assert_eq!(failed.len(), 1);
        assert!(
            matches!(&failed[0].result, CaseResult::Panicked(message) if message == "boom"),
            "{:?}",
            failed[0].result
        );

        assert!(dir.path().join("run_First.txt").exists());
        assert!(
            !dir.path().join("run_Second.txt").exists(),
            "panicked case leaves no record"
        );
    }

    #[test]
    fn unconfigured_run_fails_every_case() {
        let param = SharedRunParam::new();
        let outcome = run_case(&case("First", passing), &param, NamingPolicy::AsDeclared);
        assert_eq!(outcome.path, None);
        assert!(matches!(
            outcome.result,
            CaseResult::Failed(CaseError::Config(ConfigError::Unconfigured))
        ));
    }
}

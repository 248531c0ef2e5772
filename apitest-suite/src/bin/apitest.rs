// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use apitest_recorder::{config::RunConfig, SharedRunParam};
use apitest_suite::{cases, runner};
use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use std::num::NonZeroUsize;
use tracing_subscriber::EnvFilter;

/// Run the tensor API regression suite and record observed values.
#[derive(Debug, Parser)]
#[command(name = "apitest", version)]
struct Args {
    /// Base path for record files.
    #[arg(long, short, env = "APITEST_OUTPUT")]
    output: Option<Utf8PathBuf>,

    /// Number of cases to run concurrently [default: available parallelism].
    #[arg(long, env = "APITEST_TEST_THREADS")]
    test_threads: Option<usize>,

    /// Write every case to its own record file.
    #[arg(long)]
    per_case: bool,

    /// Only run cases whose `suite::name` contains this string.
    #[arg(long)]
    filter: Option<String>,

    /// List matching cases and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let selected: Vec<_> = cases::all()
        .into_iter()
        .filter(|case| match &args.filter {
            Some(filter) => case.qualified_name().contains(filter.as_str()),
            None => true,
        })
        .collect();

    if args.list {
        for case in &selected {
            println!("{}", case.qualified_name());
        }
        return Ok(());
    }

    let config = RunConfig {
        output: args.output,
        test_threads: args.test_threads,
        per_case: args.per_case,
    };
    let available = std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
    let resolved = config
        .resolve(available, cases::shared_count(&selected))
        .wrap_err("invalid run configuration")?;

    let param = SharedRunParam::global();
    param
        .initialize(resolved.base_path.clone())
        .wrap_err("failed to initialize output base path")?;

    let summary = runner::run_cases(&selected, param, resolved.threads, resolved.naming)?;

    for outcome in summary.failed() {
        eprintln!(
            "FAIL {}: {:?}",
            outcome.case.qualified_name(),
            outcome.result
        );
    }
    eprintln!(
        "{} of {} cases passed",
        summary.passed(),
        summary.outcomes.len()
    );

    if !summary.all_passed() {
        bail!("{} case(s) failed", summary.outcomes.len() - summary.passed());
    }
    Ok(())
}

// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Result recording for tensor API regression suites.
//!
//! Every case in a suite records the values it observes into a plain-text
//! record file, which an external tool diffs against golden output. This crate
//! provides the two pieces every case depends on:
//!
//! - [`SharedRunParam`]: the output base path, set once at startup and read
//!   concurrently by cases.
//! - [`RecordFile`](record::RecordFile): an atomically written, per-case
//!   record.

pub mod config;
pub mod errors;
pub mod record;
mod run_param;

pub use run_param::SharedRunParam;

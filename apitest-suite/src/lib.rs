// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regression suite for the `ndarray` tensor API.
//!
//! Cases observe layout, element type, storage and metadata accessors and
//! record what they see with [`apitest_recorder`]. The `apitest` binary runs
//! them; golden-file comparison happens outside this crate.

pub mod cases;
pub mod runner;

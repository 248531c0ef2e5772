// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-case record files.
//!
//! A record is a plain-text file of whitespace-separated tokens, one per
//! observed value, in the order they were recorded. Every token is followed by
//! a single space, so a record of `0` is the two bytes `"0 "` and an empty
//! record is an empty file. There is no header and no trailing newline.
//!
//! [`RecordFile`] writes a record atomically, [`RecordTarget`] decides its
//! path, and [`read_record`] reads one back.

mod file;
mod reader;
mod target;
mod token;

pub use file::*;
pub use reader::*;
pub use target::*;
pub use token::*;

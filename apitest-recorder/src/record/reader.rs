// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading records back.

use crate::errors::RecordError;
use camino::Utf8Path;

/// Reads a record file and splits it into tokens.
///
/// Tokens are separated by any run of whitespace, so a record written with a
/// trailing separator and one without produce the same tokens.
pub fn read_record(path: &Utf8Path) -> Result<Vec<String>, RecordError> {
    let contents = std::fs::read_to_string(path).map_err(|error| RecordError::Read {
        path: path.to_path_buf(),
        error,
    })?;
    Ok(parse_tokens(&contents))
}

/// Splits record contents into tokens.
pub fn parse_tokens(contents: &str) -> Vec<String> {
    contents.split_whitespace().map(str::to_owned).collect()
}

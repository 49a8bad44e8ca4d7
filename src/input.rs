//! Reading numeric sequences from text.
//!
//! Values may be separated by whitespace, commas or newlines; anything after
//! `#` on a line is ignored. Non-finite tokens such as `NaN` parse fine here
//! and are rejected later by input validation.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{MassError, Result};

/// Read up to `limit` numbers from `reader` (all of them if `None`).
///
/// `source_name` labels parse errors.
pub fn read_sequence<R: BufRead>(
    reader: R,
    limit: Option<usize>,
    source_name: &str,
) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    if limit == Some(0) {
        return Ok(values);
    }
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("");
        for token in content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let value = token.parse::<f64>().map_err(|_| MassError::Parse {
                source_name: source_name.to_string(),
                line: line_no + 1,
                token: token.to_string(),
            })?;
            values.push(value);
            if limit == Some(values.len()) {
                return Ok(values);
            }
        }
    }
    Ok(values)
}

/// Read up to `limit` numbers from the file at `path`.
pub fn read_sequence_file<P: AsRef<Path>>(path: P, limit: Option<usize>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let values = read_sequence(BufReader::new(file), limit, &path.display().to_string())?;
    debug!(path = %path.display(), count = values.len(), "read sequence");
    Ok(values)
}

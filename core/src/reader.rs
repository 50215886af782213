//! JSON-lines record files.
//!
//! One [`TrackerRecord`] per line. Blank lines are ignored; every other line
//! yields either a record or a [`TrackerError::Json`] carrying its 1-based line
//! number, in file order.

use std::fs;
use std::path::Path;

use memchr::memchr_iter;
use memmap2::Mmap;
use rayon::prelude::*;

use crate::error::{Result, TrackerError};
use crate::record::TrackerRecord;

/// Parse one line. `line_no` is only used for error reporting.
pub fn parse_record_line(line_no: usize, line: &[u8]) -> Result<TrackerRecord> {
    serde_json::from_slice(line).map_err(|source| TrackerError::Json {
        line: line_no,
        source,
    })
}

/// Split a buffer into lines and parse them in parallel, preserving order.
pub fn parse_record_lines(bytes: &[u8]) -> Vec<Result<TrackerRecord>> {
    let mut line_ranges: Vec<(usize, usize, usize)> = Vec::new();
    let mut start = 0;
    for (line_idx, end) in memchr_iter(b'\n', bytes).enumerate() {
        line_ranges.push((line_idx + 1, start, end));
        start = end + 1;
    }
    if start < bytes.len() {
        line_ranges.push((line_ranges.len() + 1, start, bytes.len()));
    }

    line_ranges
        .par_iter()
        .filter_map(|&(line_no, start, end)| {
            let line = bytes[start..end].trim_ascii();
            (!line.is_empty()).then(|| parse_record_line(line_no, line))
        })
        .collect()
}

/// Memory-map `path` and parse every record in it.
pub fn read_record_file<P: AsRef<Path>>(path: P) -> Result<Vec<Result<TrackerRecord>>> {
    let file = fs::File::open(path)?;
    // SAFETY: the map is read-only and dropped before returning; records are
    // copied out. Truncating the file while it is mapped is undefined behaviour.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(parse_record_lines(mmap.as_ref()))
}

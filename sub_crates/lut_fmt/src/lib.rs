//! Reader for whitespace-delimited color lookup table files.
//!
//! The format is one record per line, fields separated by runs of
//! whitespace:
//!
//! ```text
//! <id:int> <label:string> <R:int> <G:int> <B:int> <A:int>
//! ```
//!
//! Lines starting with `#` are comments, blank lines are ignored, and
//! fields past the sixth are ignored (real-world tables carry trailing
//! columns).

mod error;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

pub use error::ReadError;

/// One entry of a color lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LutEntry {
    pub id: u32,
    pub label: String,
    pub rgba: [u8; 4],
}

/// Loads all entries of the color table at `path`, in file order.
///
/// Duplicate ids are returned as-is; whether a later entry overwrites an
/// earlier one is up to the consuming structure.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<LutEntry>, ReadError> {
    read(BufReader::new(File::open(path.as_ref())?))
}

pub fn read<R: BufRead>(reader: R) -> Result<Vec<LutEntry>, ReadError> {
    let mut entries = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_record(line) {
            Some(entry) => entries.push(entry),
            None => return Err(ReadError::MalformedRecord(i + 1)),
        }
    }

    Ok(entries)
}

fn parse_record(line: &str) -> Option<LutEntry> {
    let mut fields = line.split_whitespace();

    let id = fields.next()?.parse().ok()?;
    let label = fields.next()?.into();
    let mut rgba = [0u8; 4];
    for channel in rgba.iter_mut() {
        *channel = fields.next()?.parse().ok()?;
    }

    Some(LutEntry { id, label, rgba })
}

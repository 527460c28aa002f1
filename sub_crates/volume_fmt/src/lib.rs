mod error;
mod nrrd_fmt;

use std::io::{Read, Seek};

pub use error::ReadError;

/// A 3-D label volume: one region id per voxel, row-major with the first
/// axis fastest.
///
/// Sample types narrower than 32 bits are widened on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub dimensions: [usize; 3],
    pub voxels: Vec<i32>,
}

pub fn load<R: Read + Seek>(mut reader: R) -> Result<Volume, ReadError> {
    // Try nrrd.
    match nrrd_fmt::load(&mut reader) {
        Err(ReadError::UnknownFormat) => {} // Continue to try next format.
        r => return r,
    }

    // No formats matched.
    return Err(ReadError::UnknownFormat);
}

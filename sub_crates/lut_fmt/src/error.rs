#[derive(Debug)]
#[non_exhaustive]
pub enum ReadError {
    IO(std::io::Error),

    /// The 1-based line number of the offending record.
    MalformedRecord(usize),
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::IO(ref e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::IO(e) => e.fmt(f),
            ReadError::MalformedRecord(line) => write!(
                f,
                "MalformedRecord: line {} is not a valid color table record.",
                line
            ),
        }
    }
}

impl From<std::io::Error> for ReadError {
    fn from(other: std::io::Error) -> Self {
        Self::IO(other)
    }
}

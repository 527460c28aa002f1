#[derive(Debug)]
#[non_exhaustive]
pub enum ReadError {
    IO(std::io::Error),
    UnknownFormat,
    UnsupportedFeature,
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
            ReadError::UnknownFormat => write!(f, "UnknownFormat: could not determine the volume file format."),
            ReadError::UnsupportedFeature => write!(f, "UnsupportedFeature: the volume file uses a feature that is currently unsupported such that volume loading isn't possible."),
        }
    }
}

impl From<std::io::Error> for ReadError {
    fn from(other: std::io::Error) -> Self {
        Self::IO(other)
    }
}

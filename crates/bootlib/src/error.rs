use std::fmt;

/// Generic error type
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serialise(serde_json::Error),
    Spawn { command: String, error: std::io::Error },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(s) => write!(f, "io: {s}"),
            Self::Serialise(s) => write!(f, "serialise: {s}"),
            Self::Spawn { command, error } => write!(f, "could not run '{command}': {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Serialise(error) => Some(error),
            Self::Spawn { error, .. } => Some(error),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialise(error)
    }
}

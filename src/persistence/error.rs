use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure to read a stored track
#[derive(Debug)]
pub enum TrackLoadError {
    /// File missing or unreadable
    Io { path: PathBuf, source: io::Error },
    /// File read but not a valid track
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for TrackLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackLoadError::Io { path, source } => {
                write!(f, "cannot read track {}: {}", path.display(), source)
            }
            TrackLoadError::Malformed { path, source } => {
                write!(f, "malformed track {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for TrackLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackLoadError::Io { source, .. } => Some(source),
            TrackLoadError::Malformed { source, .. } => Some(source),
        }
    }
}

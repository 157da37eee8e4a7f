//! Error types for the frame pipeline.

use std::fmt;
use std::io;

/// Failure to materialise a remote video in the cache.
#[derive(Debug)]
pub enum FetchError {
    Status(u16),
    Timeout,
    Network(String),
    Io(io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "Source responded with HTTP {}", code),
            FetchError::Timeout => write!(f, "Timed out downloading source"),
            FetchError::Network(e) => write!(f, "Network error: {}", e),
            FetchError::Io(e) => write!(f, "Write error: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FetchError {
    fn from(err: io::Error) -> Self {
        FetchError::Io(err)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Failure to read the duration of a cached video.
#[derive(Debug)]
pub enum ProbeError {
    Spawn(io::Error),
    Failed { code: Option<i32>, stderr: String },
    Unparsable(String),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Spawn(e) => write!(f, "Could not run probe tool: {}", e),
            ProbeError::Failed { code, stderr } => {
                write!(f, "Probe exited with {:?}: {}", code, stderr.trim())
            }
            ProbeError::Unparsable(out) => write!(f, "Unparsable duration: {:?}", out),
        }
    }
}

impl std::error::Error for ProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProbeError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

/// Failure to sample frames for a phase.
#[derive(Debug)]
pub enum ExtractionError {
    Spawn(io::Error),
    Failed { code: Option<i32>, stderr: String },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::Spawn(e) => write!(f, "Could not run extraction tool: {}", e),
            ExtractionError::Failed { code, stderr } => {
                write!(f, "Extraction exited with {:?}: {}", code, stderr.trim())
            }
        }
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::Spawn(e) => Some(e),
            ExtractionError::Failed { .. } => None,
        }
    }
}

/// Any failure that aborts a frame request.
#[derive(Debug)]
pub enum PipelineError {
    Fetch(FetchError),
    Probe(ProbeError),
    Extraction { phase: String, source: ExtractionError },
    Io(io::Error),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Fetch(e) => write!(f, "Fetch failed: {}", e),
            PipelineError::Probe(e) => write!(f, "Probe failed: {}", e),
            PipelineError::Extraction { phase, source } => {
                write!(f, "Frame extraction failed for phase {}: {}", phase, source)
            }
            PipelineError::Io(e) => write!(f, "Cache I/O error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Fetch(e) => Some(e),
            PipelineError::Probe(e) => Some(e),
            PipelineError::Extraction { source, .. } => Some(source),
            PipelineError::Io(e) => Some(e),
        }
    }
}

impl From<FetchError> for PipelineError {
    fn from(err: FetchError) -> Self {
        PipelineError::Fetch(err)
    }
}

impl From<ProbeError> for PipelineError {
    fn from(err: ProbeError) -> Self {
        PipelineError::Probe(err)
    }
}

impl From<io::Error> for PipelineError {
    fn from(err: io::Error) -> Self {
        PipelineError::Io(err)
    }
}

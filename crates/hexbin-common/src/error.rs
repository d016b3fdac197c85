//! Error types for the hexbin pipeline.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias using HexbinError.
pub type HexbinResult<T> = Result<T, HexbinError>;

/// A single chunk that could not be aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkFailure {
    /// Index of the chunk within the partition.
    pub chunk: usize,
    /// Hexagon being processed when the failure happened.
    pub cell: String,
    pub message: String,
}

impl fmt::Display for ChunkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk {} (cell {}): {}", self.chunk, self.cell, self.message)
    }
}

/// Primary error type for hexbin operations.
///
/// A hexagon without valid pixels is not an error; it is an absent mean.
#[derive(Debug, Error)]
pub enum HexbinError {
    // === Configuration ===
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    // === Input ===
    #[error("failed to open raster {path}: {message}")]
    RasterOpenFailure { path: String, message: String },

    // === Aggregation ===
    #[error("aggregation failed in {0}")]
    ChunkFailed(ChunkFailure),

    #[error("{} chunk(s) failed: {}", .0.len(), format_failures(.0))]
    ChunksFailed(Vec<ChunkFailure>),

    // === Output ===
    #[error("failed to write output {path}: {message}")]
    OutputWriteFailure { path: String, message: String },

    // === Infrastructure ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HexbinError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a RasterOpenFailure error.
    pub fn raster_open(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::RasterOpenFailure {
            path: path.as_ref().display().to_string(),
            message: msg.into(),
        }
    }

    /// Create a ChunkFailed error.
    pub fn chunk_failed(chunk: usize, cell: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ChunkFailed(ChunkFailure {
            chunk,
            cell: cell.into(),
            message: msg.into(),
        })
    }

    /// Create an OutputWriteFailure error.
    pub fn output_write(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::OutputWriteFailure {
            path: path.as_ref().display().to_string(),
            message: msg.into(),
        }
    }

    /// True for errors raised before any I/O took place.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    /// Chunk failures carried by this error, if any.
    pub fn chunk_failures(&self) -> Vec<ChunkFailure> {
        match self {
            Self::ChunkFailed(failure) => vec![failure.clone()],
            Self::ChunksFailed(failures) => failures.clone(),
            _ => Vec::new(),
        }
    }
}

fn format_failures(failures: &[ChunkFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_failed_lists_every_chunk() {
        let err = HexbinError::ChunksFailed(vec![
            ChunkFailure {
                chunk: 2,
                cell: "8828308281fffff".to_string(),
                message: "non-finite mean".to_string(),
            },
            ChunkFailure {
                chunk: 5,
                cell: "8828308283fffff".to_string(),
                message: "non-finite mean".to_string(),
            },
        ]);

        let msg = err.to_string();
        assert!(msg.starts_with("2 chunk(s) failed"));
        assert!(msg.contains("chunk 2 (cell 8828308281fffff)"));
        assert!(msg.contains("chunk 5"));
        assert_eq!(err.chunk_failures().len(), 2);
    }

    #[test]
    fn test_helpers() {
        assert!(HexbinError::invalid_config("chunk_size must be > 0").is_configuration());

        let err = HexbinError::raster_open("/data/missing.tif", "not found");
        assert_eq!(
            err.to_string(),
            "failed to open raster /data/missing.tif: not found"
        );

        let err = HexbinError::chunk_failed(3, "abc", "boom");
        assert_eq!(err.chunk_failures()[0].chunk, 3);
    }
}

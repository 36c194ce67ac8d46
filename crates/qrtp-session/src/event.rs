use std::fmt;

use qrtp_frame::{FrameKind, HeaderKey, Verdict};
use serde::Serialize;

/// A non-fatal problem noticed during reassembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "anomaly", rename_all = "snake_case")]
pub enum Anomaly {
    /// A chunk arrived whose index is not the next expected one.
    OutOfOrder { expected: u64, actual: u64 },
    /// The number of distinct chunks differs from the advertised `LEN`.
    ChunkCountMismatch { expected: u64, received: u64 },
    /// The reassembled bytes do not match the advertised `HASH`.
    IntegrityMismatch { expected: String, actual: String },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::OutOfOrder { expected, actual } => write!(
                f,
                "position lost: expected chunk {expected} but got {actual}"
            ),
            Anomaly::ChunkCountMismatch { expected, received } => write!(
                f,
                "chunk count mismatch: header announced {expected}, received {received}"
            ),
            Anomaly::IntegrityMismatch { expected, actual } => {
                write!(f, "hash check failed: expected {expected}, got {actual}")
            }
        }
    }
}

/// Something that happened while a frame was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    MessageStarted,
    HeaderField { key: HeaderKey, value: String },
    HeaderComplete { chunk_count: u64, hash: String },
    ChunkApplied { index: u64, size: usize },
    /// A chunk index that was already applied; ignored.
    DuplicateChunk { index: u64 },
    /// A re-scan of a control frame that was already applied; ignored.
    DuplicateControl { kind: FrameKind },
    Anomaly(Anomaly),
    Completed { verdict: Verdict, size: usize },
}

impl Event {
    /// Whether the event moved the session forward.
    ///
    /// Re-scans of already-applied frames do not count.
    pub fn is_progress(&self) -> bool {
        !matches!(
            self,
            Event::DuplicateChunk { .. } | Event::DuplicateControl { .. }
        )
    }
}

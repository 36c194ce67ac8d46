/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload matches none of the frame patterns.
    #[error("unrecognized frame payload")]
    Unrecognized,

    /// A data frame body is not canonical standard base64.
    #[error("invalid base64 in data frame {index}: {source}")]
    InvalidBase64 {
        index: u64,
        source: base64::DecodeError,
    },

    /// A numeric field is not a decimal integer that fits in 64 bits.
    #[error("invalid {field} value {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// The `HASH` field is not a hex string.
    #[error("invalid HASH value {0:?} (expected hex digits)")]
    InvalidHash(String),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing a chunk file.
    #[error("chunk file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A chunk file line is not canonical standard base64.
    #[error("invalid base64 on line {line}: {source}")]
    InvalidLine {
        line: usize,
        source: base64::DecodeError,
    },
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors that can occur on a symbol channel.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// An I/O error occurred while emitting or polling symbols.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A scanned payload was not valid UTF-8 text.
    #[error("payload on line {line} is not valid UTF-8")]
    InvalidText { line: usize },

    /// The channel was closed by the other side.
    #[error("channel closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, ChannelError>;

use std::time::Duration;

use qrtp_channel::ChannelError;
use qrtp_frame::{FrameError, FrameKind};

use crate::receiver::Phase;

/// Errors that end a receive session.
///
/// Every variant is fatal for the session that produced it. Recoverable
/// conditions are reported as [`Anomaly`](crate::Anomaly) events instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The frame is not valid in the current phase.
    #[error("unexpected frame while {state}: {reason} (payload {payload:?})")]
    UnexpectedFrame {
        state: Phase,
        /// `None` when the payload matched no frame pattern at all.
        kind: Option<FrameKind>,
        reason: &'static str,
        payload: String,
    },

    /// The header block closed without a usable `LEN` and `HASH`.
    #[error("header incomplete: missing {missing}")]
    IncompleteHeader { missing: &'static str },

    /// A frame could not be decoded.
    #[error("malformed frame while {state} (payload {payload:?}): {source}")]
    MalformedFrame {
        state: Phase,
        payload: String,
        source: FrameError,
    },

    /// The session already completed; a new session is needed.
    #[error("session is {state}; no further frames are accepted")]
    Terminated { state: Phase },

    /// The payload source ended before the message completed.
    #[error("payload stream ended while {state}")]
    StreamEnded { state: Phase },

    /// No progress was made within the idle timeout.
    #[error("no progress for {idle:?} while {state}")]
    TimedOut { state: Phase, idle: Duration },

    /// The caller abandoned the session.
    #[error("receive cancelled while {state}")]
    Cancelled { state: Phase },

    /// The payload source failed.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

impl SessionError {
    /// True for a frame seen before any message started, such as a rescan
    /// of the previous message's end marker.
    pub fn is_stray(&self) -> bool {
        matches!(
            self,
            SessionError::UnexpectedFrame {
                state: Phase::AwaitingStart,
                ..
            }
        )
    }
}

/// Errors that stop a send.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// There is nothing to send.
    #[error("no data to send")]
    EmptyPayload,

    /// The symbol sink failed.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

pub type Result<T> = std::result::Result<T, SessionError>;

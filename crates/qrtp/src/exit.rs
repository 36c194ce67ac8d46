use std::fmt;
use std::io;

use qrtp_channel::ChannelError;
use qrtp_frame::FrameError;
use qrtp_session::{SendError, SessionError};

// Process exit codes. `USAGE` is sysexits, `TIMEOUT` matches coreutils `timeout`,
// and `INTERRUPTED` is the shell status for SIGINT.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
/// A message arrived but its digest did not match the header.
pub const INTEGRITY_MISMATCH: i32 = 2;
pub const PERMISSION_DENIED: i32 = 50;
pub const NOT_FOUND: i32 = 51;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;
pub const INTERRUPTED: i32 = 130;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound => NOT_FOUND,
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::InvalidData => DATA_INVALID,
        io::ErrorKind::BrokenPipe | io::ErrorKind::WriteZero => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn channel_error(context: &str, err: ChannelError) -> CliError {
    match err {
        ChannelError::Io(source) => io_error(context, source),
        ChannelError::InvalidText { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ChannelError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Channel(err) => channel_error(context, err),
        SessionError::UnexpectedFrame { .. }
        | SessionError::IncompleteHeader { .. }
        | SessionError::MalformedFrame { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        SessionError::TimedOut { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        SessionError::Cancelled { .. } => CliError::new(INTERRUPTED, format!("{context}: {err}")),
        SessionError::StreamEnded { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
        SessionError::Terminated { .. } => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn send_error(context: &str, err: SendError) -> CliError {
    match err {
        SendError::Channel(err) => channel_error(context, err),
        SendError::EmptyPayload => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

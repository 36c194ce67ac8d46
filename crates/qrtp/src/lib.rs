//! One-way byte transfer over a sequence of scanned symbols.
//!
//! qrtp moves an arbitrary payload through a channel that can only show
//! one short text symbol at a time (QR codes on a screen, read by a
//! camera). There is no back channel: the receiver tolerates re-scans and
//! reordering and checks the result against a digest sent up front.
//!
//! # Crate Structure
//!
//! - [`channel`] — Symbol sink/source capabilities and text stand-ins
//! - [`frame`] — Frame grammar, chunking, digest and chunk files
//! - [`session`] — Sender session and receiver state machine

/// Re-export channel types.
pub mod channel {
    pub use qrtp_channel::*;
}

/// Re-export frame types.
pub mod frame {
    pub use qrtp_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use qrtp_session::*;
}

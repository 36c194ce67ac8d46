//! Sender and receiver sessions for one-way symbol transfers.
//!
//! A [`SenderSession`] turns a payload into an ordered run of frames and
//! emits them through a [`SymbolSink`](qrtp_channel::SymbolSink) with a
//! fixed pause between symbols. It never learns what was scanned.
//!
//! A [`ReceiverSession`] is a value-typed state machine: each call to
//! [`ReceiverSession::process`] consumes the session and one frame and
//! returns the next session plus the events the frame produced. Fatal
//! protocol errors end the session; ordering and integrity problems are
//! reported as [`Anomaly`] values and never abort reassembly.
//!
//! [`receive`] drives a receiver from a
//! [`PayloadSource`](qrtp_channel::PayloadSource) until a message completes.

pub mod driver;
pub mod error;
pub mod event;
pub mod message;
pub mod receiver;
pub mod sender;

pub use driver::{receive, receive_with_cancel, CancelHandle};
pub use error::{Result, SendError, SessionError};
pub use event::{Anomaly, Event};
pub use message::Message;
pub use receiver::{Header, Phase, ReceiverConfig, ReceiverSession, Received, Transition};
pub use sender::{Pacer, SendReport, SenderConfig, SenderSession, ThreadSleep, DEFAULT_PACING};

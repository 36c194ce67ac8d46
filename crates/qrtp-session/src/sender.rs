use std::time::Duration;

use bytes::Bytes;
use qrtp_channel::SymbolSink;
use qrtp_frame::{encode_frame, DigestMode, Frame, FrameKind, DEFAULT_CHUNK_SIZE};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SendError;
use crate::message::Message;

/// Default pause between two symbols.
pub const DEFAULT_PACING: Duration = Duration::from_millis(200);

/// Configuration for a sender session.
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// Chunk size in bytes. Default: 30.
    pub chunk_size: usize,
    /// Pause between consecutive symbols, giving the scanner time to settle.
    /// Default: 200 ms.
    pub pacing: Duration,
    /// Digest advertised in the header. Default: byte-string literal form.
    pub digest: DigestMode,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            pacing: DEFAULT_PACING,
            digest: DigestMode::default(),
        }
    }
}

/// Waits between symbols.
pub trait Pacer {
    fn pause(&mut self, duration: Duration);
}

/// [`Pacer`] that blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Summary of a completed send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReport {
    pub bytes: usize,
    pub chunk_size: usize,
    pub chunks: usize,
    pub frames: usize,
    pub hash: String,
}

/// Emits one message as an ordered run of symbols.
///
/// The order is fixed and total: message begin, header block, data frames
/// by ascending index, message end. There is no feedback from the scanner.
#[derive(Debug, Clone)]
pub struct SenderSession {
    message: Message,
    config: SenderConfig,
}

impl SenderSession {
    /// Prepare a session for `payload`.
    ///
    /// Returns `SendError::EmptyPayload` if there is nothing to send.
    pub fn new(payload: impl Into<Bytes>, config: SenderConfig) -> Result<Self, SendError> {
        let message = Message::new(payload, config.chunk_size, config.digest);
        if message.is_empty() {
            return Err(SendError::EmptyPayload);
        }
        Ok(Self { message, config })
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Every frame, in emission order.
    pub fn frames(&self) -> Vec<Frame> {
        self.message.frames()
    }

    /// Every frame's wire text, in emission order.
    pub fn payloads(&self) -> Vec<String> {
        self.frames().iter().map(encode_frame).collect()
    }

    /// Emit every frame through `sink`, sleeping between symbols.
    pub fn send<S: SymbolSink>(&self, sink: &mut S) -> Result<SendReport, SendError> {
        self.send_with_pacer(sink, &mut ThreadSleep)
    }

    /// Emit every frame through `sink`, pausing with `pacer` between symbols.
    pub fn send_with_pacer<S: SymbolSink, P: Pacer>(
        &self,
        sink: &mut S,
        pacer: &mut P,
    ) -> Result<SendReport, SendError> {
        let frames = self.frames();
        let total = self.message.chunk_count();
        info!(
            bytes = self.message.payload().len(),
            chunks = total,
            hash = self.message.digest(),
            "sending message"
        );

        let mut sent_chunks = 0usize;
        for (i, frame) in frames.iter().enumerate() {
            if i > 0 {
                pacer.pause(self.config.pacing);
            }
            sink.emit(&encode_frame(frame))?;

            if frame.kind() == FrameKind::Data {
                sent_chunks += 1;
                debug!(sent = sent_chunks, total, "chunk emitted");
            }
        }

        info!(frames = frames.len(), "message sent");
        Ok(SendReport {
            bytes: self.message.payload().len(),
            chunk_size: self.message.chunk_size(),
            chunks: total,
            frames: frames.len(),
            hash: self.message.digest().to_string(),
        })
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use qrtp_channel::PayloadSource;
use tracing::{debug, info, trace, warn};

use crate::error::{Result, SessionError};
use crate::event::Event;
use crate::receiver::{Phase, ReceiverConfig, ReceiverSession, Received};

/// Lets another thread abandon a running [`receive_with_cancel`].
///
/// Cancellation is checked between payloads; a source blocked inside
/// `poll_next` is not interrupted. Callers that must stop a blocked source
/// can consult [`CancelHandle::in_message`] and exit outright when idle.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    in_message: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// True while a receive driven with this handle is past the message
    /// start and has not yet returned.
    pub fn in_message(&self) -> bool {
        self.in_message.load(Ordering::SeqCst)
    }
}

/// Receive one message from `source`.
///
/// Polls payloads and applies them until the message end is processed.
/// Returns the reassembled bytes with the verdict and every anomaly seen.
pub fn receive<P: PayloadSource>(source: &mut P, config: &ReceiverConfig) -> Result<Received> {
    receive_with_cancel(source, config, &CancelHandle::new())
}

/// Like [`receive`], stopping early once `cancel` fires.
pub fn receive_with_cancel<P: PayloadSource>(
    source: &mut P,
    config: &ReceiverConfig,
    cancel: &CancelHandle,
) -> Result<Received> {
    let result = drive(source, config, cancel);
    cancel.in_message.store(false, Ordering::SeqCst);
    result
}

fn drive<P: PayloadSource>(
    source: &mut P,
    config: &ReceiverConfig,
    cancel: &CancelHandle,
) -> Result<Received> {
    let mut session = ReceiverSession::with_config(config.clone());
    let mut last_progress = Instant::now();

    loop {
        let state = session.phase();
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled { state });
        }

        let Some(payload) = source.poll_next()? else {
            return Err(SessionError::StreamEnded { state });
        };
        trace!(payload = %payload, "payload scanned");

        let step = match session.accept(&payload) {
            Ok(step) => step,
            Err(err) if err.is_stray() => {
                debug!(error = %err, "stray payload before message start");
                return Err(err);
            }
            Err(err) => {
                warn!(error = %err, "session aborted");
                return Err(err);
            }
        };
        cancel
            .in_message
            .store(step.session.phase() != Phase::AwaitingStart, Ordering::SeqCst);

        let mut progressed = false;
        for event in &step.events {
            progressed |= event.is_progress();
            log_event(event);
        }

        if progressed {
            last_progress = Instant::now();
        } else if let Some(idle) = config.idle_timeout {
            if last_progress.elapsed() >= idle {
                return Err(SessionError::TimedOut {
                    state: step.session.phase(),
                    idle,
                });
            }
        }

        session = match step.session.into_received() {
            Ok(received) => return Ok(received),
            Err(session) => session,
        };
    }
}

fn log_event(event: &Event) {
    match event {
        Event::MessageStarted => info!("message begin"),
        Event::HeaderField { key, value } => info!(%key, value = %value, "header field"),
        Event::HeaderComplete { chunk_count, hash } => {
            info!(chunk_count, hash = %hash, "header complete")
        }
        Event::ChunkApplied { index, size } => debug!(index, size, "chunk applied"),
        Event::DuplicateChunk { index } => trace!(index, "duplicate chunk ignored"),
        Event::DuplicateControl { kind } => trace!(%kind, "control frame rescan ignored"),
        Event::Anomaly(anomaly) => warn!(%anomaly, "transfer anomaly"),
        Event::Completed { verdict, size } => {
            if verdict.is_match() {
                info!(size, "message complete, checksum passed");
            } else {
                warn!(size, "message complete, checksum failed");
            }
        }
    }
}

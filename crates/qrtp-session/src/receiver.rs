use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use qrtp_frame::{
    encode_frame, parse_frame_with_config, parse_len, verify, DigestMode, Frame, FrameConfig,
    FrameError, HeaderField, HeaderKey, Verdict, HASH_KEY, LEN_KEY,
};
use serde::Serialize;
use tracing::trace;

use crate::error::{Result, SessionError};
use crate::event::{Anomaly, Event};

/// Where a receive session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingStart,
    AwaitingHeader,
    ReceivingData,
    Complete,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::AwaitingStart => "awaiting start",
            Phase::AwaitingHeader => "awaiting header",
            Phase::ReceivingData => "receiving data",
            Phase::Complete => "complete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a receive session.
#[derive(Debug, Clone, Default)]
pub struct ReceiverConfig {
    /// Parser limits.
    pub frame: FrameConfig,
    /// How the advertised digest was computed. Must match the sender.
    pub digest: DigestMode,
    /// Give up when no frame makes progress for this long. Default: wait forever.
    pub idle_timeout: Option<Duration>,
}

/// A validated message header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub chunk_count: u64,
    pub hash: String,
}

impl Header {
    /// Whether `field` restates this header.
    fn restates(&self, field: &HeaderField) -> bool {
        match field.key {
            HeaderKey::Len => parse_len(&field.value).ok() == Some(self.chunk_count),
            HeaderKey::Hash => field.value == self.hash,
        }
    }
}

/// The result of a completed receive session.
///
/// The bytes are kept even when the verdict is a mismatch; the caller
/// decides whether to use them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Received {
    /// Chunks concatenated in arrival order.
    #[serde(skip)]
    pub data: Bytes,
    pub size: usize,
    pub header: Header,
    pub verdict: Verdict,
    /// Distinct chunks applied.
    pub chunks: u64,
    /// Duplicate chunk scans ignored.
    pub duplicates: u64,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, Default)]
struct PendingHeader {
    len: Option<String>,
    hash: Option<String>,
}

impl PendingHeader {
    fn set(&mut self, field: &HeaderField) {
        let slot = match field.key {
            HeaderKey::Len => &mut self.len,
            HeaderKey::Hash => &mut self.hash,
        };
        *slot = Some(field.value.clone());
    }

    fn finish(self) -> Result<Header> {
        let len = self.len.filter(|v| !v.is_empty());
        let hash = self.hash.filter(|v| !v.is_empty());

        let (len, hash) = match (len, hash) {
            (Some(len), Some(hash)) => (len, hash),
            (None, Some(_)) => return Err(SessionError::IncompleteHeader { missing: LEN_KEY }),
            (Some(_), None) => return Err(SessionError::IncompleteHeader { missing: HASH_KEY }),
            (None, None) => {
                return Err(SessionError::IncompleteHeader {
                    missing: "LEN and HASH",
                })
            }
        };

        let chunk_count = parse_len(&len).map_err(|source| SessionError::MalformedFrame {
            state: Phase::AwaitingHeader,
            payload: format!("{LEN_KEY}:{len}"),
            source,
        })?;

        Ok(Header { chunk_count, hash })
    }
}

#[derive(Debug, Clone)]
struct Assembly {
    header: Header,
    seen: HashSet<u64>,
    cursor: u64,
    buf: BytesMut,
    duplicates: u64,
    anomalies: Vec<Anomaly>,
}

impl Assembly {
    fn new(header: Header) -> Self {
        Self {
            header,
            seen: HashSet::new(),
            cursor: 0,
            buf: BytesMut::new(),
            duplicates: 0,
            anomalies: Vec::new(),
        }
    }

    fn apply(&mut self, index: u64, data: &[u8], events: &mut Vec<Event>) {
        if !self.seen.insert(index) {
            self.duplicates += 1;
            events.push(Event::DuplicateChunk { index });
            return;
        }

        if index != self.cursor {
            self.anomaly(
                Anomaly::OutOfOrder {
                    expected: self.cursor,
                    actual: index,
                },
                events,
            );
            self.cursor = index;
        }
        self.cursor = self.cursor.saturating_add(1);

        self.buf.extend_from_slice(data);
        events.push(Event::ChunkApplied {
            index,
            size: data.len(),
        });
    }

    fn finish(mut self, mode: DigestMode, events: &mut Vec<Event>) -> Received {
        let received = self.seen.len() as u64;
        if received != self.header.chunk_count {
            self.anomaly(
                Anomaly::ChunkCountMismatch {
                    expected: self.header.chunk_count,
                    received,
                },
                events,
            );
        }

        let data = std::mem::take(&mut self.buf).freeze();
        let verdict = verify(&data, &self.header.hash, mode);
        if let Verdict::Mismatch { expected, actual } = &verdict {
            self.anomaly(
                Anomaly::IntegrityMismatch {
                    expected: expected.clone(),
                    actual: actual.clone(),
                },
                events,
            );
        }

        events.push(Event::Completed {
            verdict: verdict.clone(),
            size: data.len(),
        });

        Received {
            size: data.len(),
            data,
            header: self.header,
            verdict,
            chunks: received,
            duplicates: self.duplicates,
            anomalies: self.anomalies,
        }
    }

    fn anomaly(&mut self, anomaly: Anomaly, events: &mut Vec<Event>) {
        self.anomalies.push(anomaly.clone());
        events.push(Event::Anomaly(anomaly));
    }
}

#[derive(Debug, Clone)]
enum Stage {
    AwaitingStart,
    AwaitingHeader(PendingHeader),
    ReceivingData(Assembly),
    Complete(Received),
}

/// A receive session for exactly one message.
///
/// Each frame consumes the session and yields the next one:
///
/// ```
/// use qrtp_frame::Frame;
/// use qrtp_session::{Phase, ReceiverSession};
///
/// let session = ReceiverSession::new();
/// let step = session.process(&Frame::MessageBegin).unwrap();
/// assert_eq!(step.session.phase(), Phase::AwaitingHeader);
/// ```
///
/// An `Err` from [`process`](Self::process) or [`accept`](Self::accept)
/// means the session failed; it has been consumed and cannot continue.
#[derive(Debug, Clone)]
pub struct ReceiverSession {
    config: ReceiverConfig,
    stage: Stage,
}

/// The session after one frame, plus what that frame did.
#[derive(Debug)]
pub struct Transition {
    pub session: ReceiverSession,
    pub events: Vec<Event>,
}

impl Default for ReceiverSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiverSession {
    /// Create a session with default configuration.
    pub fn new() -> Self {
        Self::with_config(ReceiverConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config(config: ReceiverConfig) -> Self {
        Self {
            config,
            stage: Stage::AwaitingStart,
        }
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::AwaitingStart => Phase::AwaitingStart,
            Stage::AwaitingHeader(_) => Phase::AwaitingHeader,
            Stage::ReceivingData(_) => Phase::ReceivingData,
            Stage::Complete(_) => Phase::Complete,
        }
    }

    /// The header, once the header block has been accepted.
    pub fn header(&self) -> Option<&Header> {
        match &self.stage {
            Stage::ReceivingData(assembly) => Some(&assembly.header),
            Stage::Complete(received) => Some(&received.header),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.stage, Stage::Complete(_))
    }

    /// Take the result of a completed session, or get the session back.
    pub fn into_received(self) -> std::result::Result<Received, Self> {
        match self.stage {
            Stage::Complete(received) => Ok(received),
            stage => Err(Self {
                config: self.config,
                stage,
            }),
        }
    }

    /// Parse a scanned payload and apply it.
    ///
    /// A payload that matches no frame pattern is an unexpected frame before
    /// the message has started and a malformed frame afterwards.
    pub fn accept(self, payload: &str) -> Result<Transition> {
        let state = self.phase();
        if state == Phase::Complete {
            return Err(SessionError::Terminated { state });
        }

        let frame = match parse_frame_with_config(payload, &self.config.frame) {
            Ok(frame) => frame,
            Err(FrameError::Unrecognized) if state == Phase::AwaitingStart => {
                return Err(SessionError::UnexpectedFrame {
                    state,
                    kind: None,
                    reason: "message not started",
                    payload: payload.to_string(),
                });
            }
            Err(source) => {
                return Err(SessionError::MalformedFrame {
                    state,
                    payload: payload.to_string(),
                    source,
                });
            }
        };

        self.process(&frame)
    }

    /// Apply one frame.
    pub fn process(self, frame: &Frame) -> Result<Transition> {
        let Self { config, stage } = self;
        let mut events = Vec::new();

        let stage = match stage {
            Stage::AwaitingStart => match frame {
                Frame::MessageBegin => {
                    events.push(Event::MessageStarted);
                    Stage::AwaitingHeader(PendingHeader::default())
                }
                _ => return Err(unexpected(Phase::AwaitingStart, frame, "message not started")),
            },

            Stage::AwaitingHeader(mut pending) => match frame {
                Frame::MessageBegin => {
                    events.push(Event::DuplicateControl { kind: frame.kind() });
                    Stage::AwaitingHeader(pending)
                }
                Frame::HeaderBegin => Stage::AwaitingHeader(pending),
                Frame::HeaderField(field) => {
                    pending.set(field);
                    events.push(Event::HeaderField {
                        key: field.key,
                        value: field.value.clone(),
                    });
                    Stage::AwaitingHeader(pending)
                }
                Frame::HeaderEnd => {
                    let header = pending.finish()?;
                    events.push(Event::HeaderComplete {
                        chunk_count: header.chunk_count,
                        hash: header.hash.clone(),
                    });
                    Stage::ReceivingData(Assembly::new(header))
                }
                Frame::Data { .. } | Frame::MessageEnd => {
                    return Err(unexpected(
                        Phase::AwaitingHeader,
                        frame,
                        "header not complete",
                    ))
                }
            },

            Stage::ReceivingData(mut assembly) => match frame {
                Frame::Data { index, data } => {
                    assembly.apply(*index, data, &mut events);
                    Stage::ReceivingData(assembly)
                }
                Frame::MessageEnd => Stage::Complete(assembly.finish(config.digest, &mut events)),
                Frame::HeaderField(field) if !assembly.header.restates(field) => {
                    return Err(unexpected(
                        Phase::ReceivingData,
                        frame,
                        "header field conflicts with accepted header",
                    ))
                }
                Frame::MessageBegin | Frame::HeaderBegin | Frame::HeaderField(_) | Frame::HeaderEnd => {
                    events.push(Event::DuplicateControl { kind: frame.kind() });
                    Stage::ReceivingData(assembly)
                }
            },

            Stage::Complete(_) => {
                return Err(SessionError::Terminated {
                    state: Phase::Complete,
                })
            }
        };

        let session = Self { config, stage };
        trace!(kind = %frame.kind(), phase = %session.phase(), events = events.len(), "frame applied");
        Ok(Transition { session, events })
    }
}

fn unexpected(state: Phase, frame: &Frame, reason: &'static str) -> SessionError {
    SessionError::UnexpectedFrame {
        state,
        kind: Some(frame.kind()),
        reason,
        payload: encode_frame(frame),
    }
}

#[cfg(test)]
mod tests {
    use qrtp_frame::{digest, FrameKind, HEADER_BEGIN, HEADER_END, MESSAGE_BEGIN, MESSAGE_END};

    use super::*;

    const HELLO_HASH: &str = "f2378e3d80f8e3f0d576f785b8549ec866c566e9";

    fn feed(payloads: &[&str]) -> Result<(ReceiverSession, Vec<Event>)> {
        let mut session = ReceiverSession::new();
        let mut events = Vec::new();
        for payload in payloads {
            let step = session.accept(payload)?;
            events.extend(step.events);
            session = step.session;
        }
        Ok((session, events))
    }

    fn hello_header() -> Vec<String> {
        vec![
            MESSAGE_BEGIN.to_string(),
            HEADER_BEGIN.to_string(),
            "LEN:3".to_string(),
            format!("HASH:{HELLO_HASH}"),
            HEADER_END.to_string(),
        ]
    }

    fn with_header(rest: &[&str]) -> Vec<String> {
        let mut all = hello_header();
        all.extend(rest.iter().map(|s| s.to_string()));
        all
    }

    fn feed_owned(payloads: &[String]) -> Result<(ReceiverSession, Vec<Event>)> {
        let refs: Vec<&str> = payloads.iter().map(String::as_str).collect();
        feed(&refs)
    }

    fn anomalies(events: &[Event]) -> Vec<&Anomaly> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Anomaly(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn hello_world_end_to_end() {
        let payloads = with_header(&[
            "0000000000:SEVMTE8=",
            "0000000001:IFdPUkw=",
            "0000000002:RA==",
            MESSAGE_END,
        ]);
        let (session, events) = feed_owned(&payloads).unwrap();

        assert!(session.is_complete());
        assert!(anomalies(&events).is_empty());
        let received = session.into_received().unwrap();
        assert_eq!(received.data.as_ref(), b"HELLO WORLD");
        assert_eq!(received.verdict, Verdict::Match);
        assert_eq!(received.chunks, 3);
        assert_eq!(received.header.chunk_count, 3);
    }

    #[test]
    fn phases_advance() {
        let mut session = ReceiverSession::new();
        assert_eq!(session.phase(), Phase::AwaitingStart);
        for (payload, phase) in [
            (MESSAGE_BEGIN, Phase::AwaitingHeader),
            (HEADER_BEGIN, Phase::AwaitingHeader),
            ("LEN:1", Phase::AwaitingHeader),
            ("HASH:ab", Phase::AwaitingHeader),
            (HEADER_END, Phase::ReceivingData),
            ("0000000000:RA==", Phase::ReceivingData),
            (MESSAGE_END, Phase::Complete),
        ] {
            session = session.accept(payload).unwrap().session;
            assert_eq!(session.phase(), phase, "after {payload}");
        }
    }

    #[test]
    fn frame_before_start_is_unexpected() {
        for payload in [HEADER_BEGIN, "LEN:3", "0000000000:RA==", MESSAGE_END] {
            let err = ReceiverSession::new().accept(payload).unwrap_err();
            assert!(
                matches!(
                    err,
                    SessionError::UnexpectedFrame {
                        state: Phase::AwaitingStart,
                        kind: Some(_),
                        reason: "message not started",
                        ..
                    }
                ),
                "{payload}: {err}"
            );
        }
    }

    #[test]
    fn garbage_before_start_is_unexpected() {
        let err = ReceiverSession::new().accept("QrTP Rocks!").unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnexpectedFrame { kind: None, ref payload, .. } if payload == "QrTP Rocks!"
        ));
    }

    #[test]
    fn garbage_after_start_is_malformed() {
        let err = feed(&[MESSAGE_BEGIN, "QrTP Rocks!"]).unwrap_err();
        assert!(matches!(
            err,
            SessionError::MalformedFrame {
                state: Phase::AwaitingHeader,
                source: FrameError::Unrecognized,
                ..
            }
        ));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let payloads = with_header(&["0000000000:SEVMTE8"]);
        let err = feed_owned(&payloads).unwrap_err();
        assert!(matches!(
            err,
            SessionError::MalformedFrame {
                state: Phase::ReceivingData,
                source: FrameError::InvalidBase64 { index: 0, .. },
                ..
            }
        ));
    }

    #[test]
    fn data_before_header_end_is_rejected() {
        let err = feed(&[MESSAGE_BEGIN, HEADER_BEGIN, "LEN:1", "0000000000:RA=="]).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnexpectedFrame {
                state: Phase::AwaitingHeader,
                kind: Some(FrameKind::Data),
                reason: "header not complete",
                ..
            }
        ));

        let err = feed(&[MESSAGE_BEGIN, MESSAGE_END]).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnexpectedFrame {
                kind: Some(FrameKind::MessageEnd),
                ..
            }
        ));
    }

    #[test]
    fn header_end_requires_both_fields() {
        let err = feed(&[MESSAGE_BEGIN, HEADER_BEGIN, "LEN:1", HEADER_END]).unwrap_err();
        assert!(matches!(err, SessionError::IncompleteHeader { missing: "HASH" }));

        let err = feed(&[MESSAGE_BEGIN, "HASH:ab", HEADER_END]).unwrap_err();
        assert!(matches!(err, SessionError::IncompleteHeader { missing: "LEN" }));

        let err = feed(&[MESSAGE_BEGIN, HEADER_END]).unwrap_err();
        assert!(matches!(
            err,
            SessionError::IncompleteHeader {
                missing: "LEN and HASH"
            }
        ));
    }

    #[test]
    fn empty_header_values_count_as_missing() {
        let err = feed(&[MESSAGE_BEGIN, "LEN:", "HASH:ab", HEADER_END]).unwrap_err();
        assert!(matches!(err, SessionError::IncompleteHeader { missing: "LEN" }));

        let err = feed(&[MESSAGE_BEGIN, "LEN:2", "HASH:", HEADER_END]).unwrap_err();
        assert!(matches!(err, SessionError::IncompleteHeader { missing: "HASH" }));
    }

    #[test]
    fn later_header_value_wins() {
        let (session, _) =
            feed(&[MESSAGE_BEGIN, "LEN:1", "LEN:4", "HASH:ab", HEADER_END]).unwrap();
        assert_eq!(session.header().unwrap().chunk_count, 4);
    }

    #[test]
    fn duplicate_chunks_are_ignored() {
        let payloads = with_header(&[
            "0000000000:SEVMTE8=",
            "0000000000:SEVMTE8=",
            "0000000001:IFdPUkw=",
            "0000000000:SEVMTE8=",
            "0000000001:IFdPUkw=",
            "0000000002:RA==",
            "0000000002:RA==",
            MESSAGE_END,
        ]);
        let (session, events) = feed_owned(&payloads).unwrap();

        assert!(anomalies(&events).is_empty());
        let dups = events
            .iter()
            .filter(|e| matches!(e, Event::DuplicateChunk { .. }))
            .count();
        assert_eq!(dups, 4);

        let received = session.into_received().unwrap();
        assert_eq!(received.data.as_ref(), b"HELLO WORLD");
        assert_eq!(received.duplicates, 4);
        assert!(received.verdict.is_match());
    }

    #[test]
    fn control_rescans_are_ignored() {
        let payloads = with_header(&[
            HEADER_END,
            HEADER_END,
            "LEN:3",
            MESSAGE_BEGIN,
            "0000000000:SEVMTE8=",
            HEADER_BEGIN,
            "0000000001:IFdPUkw=",
            "0000000002:RA==",
            MESSAGE_END,
        ]);
        let (session, events) = feed_owned(&payloads).unwrap();
        let rescans = events
            .iter()
            .filter(|e| matches!(e, Event::DuplicateControl { .. }))
            .count();
        assert_eq!(rescans, 5);
        assert!(session.into_received().unwrap().verdict.is_match());
    }

    #[test]
    fn repeated_message_begin_while_awaiting_header() {
        let (session, events) = feed(&[MESSAGE_BEGIN, MESSAGE_BEGIN, MESSAGE_BEGIN]).unwrap();
        assert_eq!(session.phase(), Phase::AwaitingHeader);
        assert_eq!(
            events,
            vec![
                Event::MessageStarted,
                Event::DuplicateControl {
                    kind: FrameKind::MessageBegin
                },
                Event::DuplicateControl {
                    kind: FrameKind::MessageBegin
                },
            ]
        );
    }

    #[test]
    fn conflicting_header_field_after_header_fails() {
        let payloads = with_header(&["LEN:9"]);
        let err = feed_owned(&payloads).unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnexpectedFrame {
                state: Phase::ReceivingData,
                kind: Some(FrameKind::HeaderField),
                ..
            }
        ));
    }

    #[test]
    fn out_of_order_is_reported_and_resyncs() {
        let payloads = with_header(&[
            "0000000001:IFdPUkw=",
            "0000000002:RA==",
            "0000000000:SEVMTE8=",
            MESSAGE_END,
        ]);
        let (session, events) = feed_owned(&payloads).unwrap();

        let found = anomalies(&events);
        assert_eq!(found.len(), 3);
        assert_eq!(
            found[0],
            &Anomaly::OutOfOrder {
                expected: 0,
                actual: 1
            }
        );
        assert_eq!(
            found[1],
            &Anomaly::OutOfOrder {
                expected: 3,
                actual: 0
            }
        );
        assert!(matches!(found[2], Anomaly::IntegrityMismatch { .. }));

        let received = session.into_received().unwrap();
        assert_eq!(received.data.as_ref(), b" WORLDHELLO");
        assert!(!received.verdict.is_match());
        assert_eq!(received.anomalies.len(), 3);
    }

    #[test]
    fn missing_chunk_is_counted() {
        let payloads = with_header(&["0000000000:SEVMTE8=", "0000000002:RA==", MESSAGE_END]);
        let (session, _) = feed_owned(&payloads).unwrap();
        let received = session.into_received().unwrap();

        assert_eq!(received.data.as_ref(), b"HELLOD");
        assert_eq!(
            received.anomalies,
            vec![
                Anomaly::OutOfOrder {
                    expected: 1,
                    actual: 2
                },
                Anomaly::ChunkCountMismatch {
                    expected: 3,
                    received: 2
                },
                Anomaly::IntegrityMismatch {
                    expected: HELLO_HASH.to_string(),
                    actual: digest(b"HELLOD", DigestMode::ByteRepr),
                },
            ]
        );
    }

    #[test]
    fn completed_session_rejects_frames() {
        let payloads = with_header(&[
            "0000000000:SEVMTE8=",
            "0000000001:IFdPUkw=",
            "0000000002:RA==",
            MESSAGE_END,
        ]);
        let (session, _) = feed_owned(&payloads).unwrap();

        let err = session.clone().accept(MESSAGE_END).unwrap_err();
        assert!(matches!(err, SessionError::Terminated { state: Phase::Complete }));

        let err = session.process(&Frame::MessageBegin).unwrap_err();
        assert!(matches!(err, SessionError::Terminated { .. }));
    }

    #[test]
    fn raw_digest_mode() {
        let hash = digest(b"D", DigestMode::Raw);
        let config = ReceiverConfig {
            digest: DigestMode::Raw,
            ..ReceiverConfig::default()
        };
        let mut session = ReceiverSession::with_config(config);
        for payload in [
            MESSAGE_BEGIN.to_string(),
            "LEN:1".to_string(),
            format!("HASH:{hash}"),
            HEADER_END.to_string(),
            "0000000000:RA==".to_string(),
            MESSAGE_END.to_string(),
        ] {
            session = session.accept(&payload).unwrap().session;
        }
        assert!(session.into_received().unwrap().verdict.is_match());
    }

    #[test]
    fn empty_message_verifies() {
        let hash = digest(b"", DigestMode::ByteRepr);
        let header = format!("HASH:{hash}");
        let (session, _) = feed(&[MESSAGE_BEGIN, "LEN:0", header.as_str(), HEADER_END, MESSAGE_END]).unwrap();
        let received = session.into_received().unwrap();
        assert!(received.data.is_empty());
        assert!(received.verdict.is_match());
        assert!(received.anomalies.is_empty());
    }

    #[test]
    fn into_received_returns_unfinished_session() {
        let session = ReceiverSession::new();
        let session = session.into_received().unwrap_err();
        assert_eq!(session.phase(), Phase::AwaitingStart);
    }

    #[test]
    fn process_takes_frames_directly() {
        let frames = [
            Frame::MessageBegin,
            Frame::HeaderBegin,
            Frame::len_field(1),
            Frame::hash_field(digest(b"D", DigestMode::ByteRepr)),
            Frame::HeaderEnd,
            Frame::data(0, Bytes::from_static(b"D")),
            Frame::MessageEnd,
        ];
        let mut session = ReceiverSession::new();
        for frame in &frames {
            session = session.process(frame).unwrap().session;
        }
        assert!(session.into_received().unwrap().verdict.is_match());
    }
}

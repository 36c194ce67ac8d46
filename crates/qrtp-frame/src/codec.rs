use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::chunk::Chunk;
use crate::error::{FrameError, Result};
use crate::markers::{
    DEFAULT_MAX_PAYLOAD_LEN, HASH_KEY, HEADER_BEGIN, HEADER_END, INDEX_WIDTH, LEN_KEY,
    MESSAGE_BEGIN, MESSAGE_END,
};

/// Header metadata keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKey {
    /// Chunk count.
    Len,
    /// Integrity digest.
    Hash,
}

impl HeaderKey {
    /// Wire spelling of the key.
    pub fn as_str(self) -> &'static str {
        match self {
            HeaderKey::Len => LEN_KEY,
            HeaderKey::Hash => HASH_KEY,
        }
    }
}

impl fmt::Display for HeaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `KEY:value` pair from the header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub key: HeaderKey,
    /// Raw value text. May be empty; emptiness is judged at header end.
    pub value: String,
}

/// A single wire frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    MessageBegin,
    HeaderBegin,
    HeaderField(HeaderField),
    HeaderEnd,
    Data { index: u64, data: Bytes },
    MessageEnd,
}

/// Frame discriminant, for logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    MessageBegin,
    HeaderBegin,
    HeaderField,
    HeaderEnd,
    Data,
    MessageEnd,
}

impl FrameKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameKind::MessageBegin => "message-begin",
            FrameKind::HeaderBegin => "header-begin",
            FrameKind::HeaderField => "header-field",
            FrameKind::HeaderEnd => "header-end",
            FrameKind::Data => "data",
            FrameKind::MessageEnd => "message-end",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Frame {
    /// `LEN:<count>` header field.
    pub fn len_field(count: usize) -> Self {
        Frame::HeaderField(HeaderField {
            key: HeaderKey::Len,
            value: count.to_string(),
        })
    }

    /// `HASH:<digest>` header field.
    pub fn hash_field(digest: impl Into<String>) -> Self {
        Frame::HeaderField(HeaderField {
            key: HeaderKey::Hash,
            value: digest.into(),
        })
    }

    /// Data frame for a chunk.
    pub fn data(index: u64, data: impl Into<Bytes>) -> Self {
        Frame::Data {
            index,
            data: data.into(),
        }
    }

    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::MessageBegin => FrameKind::MessageBegin,
            Frame::HeaderBegin => FrameKind::HeaderBegin,
            Frame::HeaderField(_) => FrameKind::HeaderField,
            Frame::HeaderEnd => FrameKind::HeaderEnd,
            Frame::Data { .. } => FrameKind::Data,
            Frame::MessageEnd => FrameKind::MessageEnd,
        }
    }
}

impl From<&Chunk> for Frame {
    fn from(chunk: &Chunk) -> Self {
        Frame::data(chunk.index, chunk.data.clone())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::MessageBegin => f.write_str(MESSAGE_BEGIN),
            Frame::HeaderBegin => f.write_str(HEADER_BEGIN),
            Frame::HeaderField(field) => write!(f, "{}:{}", field.key, field.value),
            Frame::HeaderEnd => f.write_str(HEADER_END),
            Frame::Data { index, data } => {
                write!(f, "{index:0width$}:{}", STANDARD.encode(data), width = INDEX_WIDTH)
            }
            Frame::MessageEnd => f.write_str(MESSAGE_END),
        }
    }
}

/// Configuration for the frame parser.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum accepted payload length in bytes. Default: 4096.
    pub max_payload_len: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }
}

/// Encode a frame into its wire text.
///
/// Wire forms:
/// ```text
/// -----BEGIN MESSAGE-----
/// -----BEGIN HEADER-----
/// LEN:3
/// HASH:f2378e3d80f8e3f0d576f785b8549ec866c566e9
/// -----END HEADER-----
/// 0000000000:SEVMTE8=
/// -----END MESSAGE-----
/// ```
pub fn encode_frame(frame: &Frame) -> String {
    frame.to_string()
}

/// Every frame of one message, in emission order.
///
/// Message begin, header block (`LEN` then `HASH`), one data frame per
/// chunk in ascending index order, message end.
pub fn message_frames(chunks: &[Chunk], digest: &str) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(chunks.len() + 6);
    frames.push(Frame::MessageBegin);
    frames.push(Frame::HeaderBegin);
    frames.push(Frame::len_field(chunks.len()));
    frames.push(Frame::hash_field(digest));
    frames.push(Frame::HeaderEnd);

    let mut ordered: Vec<&Chunk> = chunks.iter().collect();
    ordered.sort_by_key(|chunk| chunk.index);
    frames.extend(ordered.into_iter().map(Frame::from));

    frames.push(Frame::MessageEnd);
    frames
}

/// Classify and decode a scanned payload with default configuration.
pub fn parse_frame(payload: &str) -> Result<Frame> {
    parse_frame_with_config(payload, &FrameConfig::default())
}

/// Classify and decode a scanned payload.
///
/// Patterns are tried in a fixed priority order and the first match wins:
/// message begin, header begin, header field, header end, data, message end.
pub fn parse_frame_with_config(payload: &str, config: &FrameConfig) -> Result<Frame> {
    if payload.len() > config.max_payload_len {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: config.max_payload_len,
        });
    }

    if payload == MESSAGE_BEGIN {
        return Ok(Frame::MessageBegin);
    }
    if payload == HEADER_BEGIN {
        return Ok(Frame::HeaderBegin);
    }
    if let Some(field) = parse_header_field(payload)? {
        return Ok(Frame::HeaderField(field));
    }
    if payload == HEADER_END {
        return Ok(Frame::HeaderEnd);
    }
    if let Some(frame) = parse_data(payload)? {
        return Ok(frame);
    }
    if payload == MESSAGE_END {
        return Ok(Frame::MessageEnd);
    }

    Err(FrameError::Unrecognized)
}

fn parse_header_field(payload: &str) -> Result<Option<HeaderField>> {
    let Some((key, value)) = payload.split_once(':') else {
        return Ok(None);
    };

    let key = match key {
        LEN_KEY => HeaderKey::Len,
        HASH_KEY => HeaderKey::Hash,
        _ => return Ok(None),
    };

    match key {
        HeaderKey::Len if !value.is_empty() => {
            parse_decimal(LEN_KEY, value)?;
        }
        HeaderKey::Hash if !value.chars().all(|c| c.is_ascii_hexdigit()) => {
            return Err(FrameError::InvalidHash(value.to_string()));
        }
        _ => {}
    }

    Ok(Some(HeaderField {
        key,
        value: value.to_string(),
    }))
}

fn parse_data(payload: &str) -> Result<Option<Frame>> {
    let Some((index, body)) = payload.split_once(':') else {
        return Ok(None);
    };
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    let index = parse_decimal("index", index)?;
    let data = STANDARD
        .decode(body)
        .map_err(|source| FrameError::InvalidBase64 { index, source })?;

    Ok(Some(Frame::data(index, data)))
}

/// Parse a run of ASCII digits as `u64`.
pub(crate) fn parse_decimal(field: &'static str, value: &str) -> Result<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FrameError::InvalidNumber {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| FrameError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Parse a `LEN` header value.
pub fn parse_len(value: &str) -> Result<u64> {
    parse_decimal(LEN_KEY, value)
}

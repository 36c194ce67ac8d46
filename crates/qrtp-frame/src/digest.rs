//! Integrity digest carried in the `HASH` header field.
//!
//! The digest deployed in the field is not taken over the payload bytes. It
//! is SHA-1 over the *byte-string literal* of the payload, `b'...'` with
//! backslash escapes, so `b"HELLO WORLD"` is hashed as the 14 characters
//! `b'HELLO WORLD'`. Existing captures carry digests computed this way, so
//! [`DigestMode::ByteRepr`] stays the default. [`DigestMode::Raw`] hashes
//! the bytes themselves and is only interoperable with peers configured the
//! same way.

use std::fmt::Write as _;

use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::chunk::Chunk;

/// How the integrity digest is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestMode {
    /// SHA-1 of the byte-string literal form (wire compatible).
    #[default]
    ByteRepr,
    /// SHA-1 of the raw payload bytes.
    Raw,
}

/// Outcome of comparing a received payload with the advertised digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Match,
    Mismatch { expected: String, actual: String },
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match)
    }
}

/// Byte-string literal form of `data`.
///
/// Single quotes unless the bytes contain `'` but no `"`. Backslash, tab,
/// newline, carriage return and the active quote are backslash-escaped;
/// any other byte outside printable ASCII becomes `\xNN`.
pub fn byte_repr(data: &[u8]) -> String {
    let quote = if data.contains(&b'\'') && !data.contains(&b'"') {
        b'"'
    } else {
        b'\''
    };

    let mut out = String::with_capacity(data.len() + 3);
    out.push('b');
    out.push(quote as char);
    for &byte in data {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if b == quote => {
                out.push('\\');
                out.push(b as char);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\x{byte:02x}");
            }
        }
    }
    out.push(quote as char);
    out
}

/// List literal form of a sequence of byte strings: `[b'..', b'..']`.
pub fn list_repr<'a>(items: impl IntoIterator<Item = &'a [u8]>) -> String {
    let mut out = String::from("[");
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&byte_repr(item));
    }
    out.push(']');
    out
}

/// Hex digest of `data` under `mode`.
pub fn digest(data: &[u8], mode: DigestMode) -> String {
    match mode {
        DigestMode::ByteRepr => sha1_hex(byte_repr(data).as_bytes()),
        DigestMode::Raw => sha1_hex(data),
    }
}

/// Digest of the chunk list literal, as reported by the chunk-file encoder.
pub fn chunk_list_digest(chunks: &[Chunk]) -> String {
    sha1_hex(list_repr(chunks.iter().map(|c| c.data.as_ref())).as_bytes())
}

/// Compare `data` against the advertised digest.
pub fn verify(data: &[u8], expected: &str, mode: DigestMode) -> Verdict {
    let actual = digest(data, mode);
    if actual == expected {
        Verdict::Match
    } else {
        Verdict::Mismatch {
            expected: expected.to_string(),
            actual,
        }
    }
}

fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

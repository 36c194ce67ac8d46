use std::io::{BufRead, ErrorKind};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::{Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Reads chunks back from a newline-separated base64 file.
///
/// Trailing whitespace is stripped from each line before strict decoding.
/// A blank line decodes to an empty chunk.
pub struct ChunkFileReader<T> {
    inner: T,
    line: usize,
    buf: String,
}

impl<T: BufRead> ChunkFileReader<T> {
    /// Create a new chunk file reader.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            line: 0,
            buf: String::new(),
        }
    }

    /// Read the next chunk. Returns `Ok(None)` at end of file.
    pub fn read_chunk(&mut self) -> Result<Option<Bytes>> {
        self.buf.clear();
        let read = loop {
            match self.inner.read_line(&mut self.buf) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        };
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;

        let line = self.line;
        STANDARD
            .decode(self.buf.trim_end())
            .map(|data| Some(Bytes::from(data)))
            .map_err(|source| FrameError::InvalidLine { line, source })
    }

    /// Read every remaining chunk and concatenate them in file order.
    pub fn read_to_end(&mut self) -> Result<Bytes> {
        let mut out = BytesMut::new();
        while let Some(chunk) = self.read_chunk()? {
            out.extend_from_slice(&chunk);
        }
        Ok(out.freeze())
    }

    /// Number of lines consumed so far.
    pub fn lines(&self) -> usize {
        self.line
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Decode a whole chunk file into the reconstructed payload.
pub fn decode_chunk_file<R: BufRead>(input: R) -> Result<Bytes> {
    ChunkFileReader::new(input).read_to_end()
}

use std::io::{ErrorKind, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use tracing::debug;

use crate::chunk::split;
use crate::error::{FrameError, Result};

/// Writes chunks as newline-separated base64 lines.
///
/// No header, no sequence numbers: line order is chunk order.
pub struct ChunkFileWriter<T> {
    inner: T,
    line: String,
    lines: usize,
}

impl<T: Write> ChunkFileWriter<T> {
    /// Create a new chunk file writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            line: String::new(),
            lines: 0,
        }
    }

    /// Write one chunk as a single base64 line.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.line.clear();
        STANDARD.encode_string(chunk, &mut self.line);
        self.line.push('\n');

        let mut offset = 0usize;
        let bytes = self.line.as_bytes();
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.lines += 1;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

/// Split `payload` and write every chunk as a line. Returns the chunk count.
pub fn encode_chunk_file<W: Write>(payload: &Bytes, chunk_size: usize, out: W) -> Result<usize> {
    let mut writer = ChunkFileWriter::new(out);
    for chunk in split(payload, chunk_size) {
        writer.write_chunk(&chunk.data)?;
    }
    writer.flush()?;
    debug!(chunks = writer.lines(), chunk_size, "chunk file written");
    Ok(writer.lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_chunk() {
        let mut out: Vec<u8> = Vec::new();
        let n = encode_chunk_file(&Bytes::from_static(b"HELLO WORLD"), 5, &mut out).unwrap();
        assert_eq!(n, 3);
        assert_eq!(out, b"SEVMTE8=\nIFdPUkw=\nRA==\n");
    }

    #[test]
    fn empty_payload_writes_nothing() {
        let mut out: Vec<u8> = Vec::new();
        let n = encode_chunk_file(&Bytes::new(), 20, &mut out).unwrap();
        assert_eq!(n, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn write_zero_is_an_error() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = ChunkFileWriter::new(Closed);
        let err = writer.write_chunk(b"x").unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WriteZero));
        assert_eq!(writer.lines(), 0);
    }
}

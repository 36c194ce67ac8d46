use std::io::{BufRead, ErrorKind, Write};

use tracing::trace;

use crate::error::{ChannelError, Result};
use crate::traits::{PayloadSource, SymbolSink};

/// Text stand-in for a symbol display: one payload per line.
///
/// Whatever renders real symbols can sit on the other end of the writer
/// (a terminal, a pipe into a QR generator, a capture file).
pub struct LineSink<W> {
    inner: W,
    emitted: usize,
}

impl<W: Write> LineSink<W> {
    /// Create a sink writing to `inner`.
    pub fn new(inner: W) -> Self {
        Self { inner, emitted: 0 }
    }

    /// Number of payloads emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Borrow the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the sink and return the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_all_retrying(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.inner.write(buf) {
                Ok(0) => return Err(ChannelError::Closed),
                Ok(n) => buf = &buf[n..],
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }
        Ok(())
    }
}

impl<W: Write> SymbolSink for LineSink<W> {
    fn emit(&mut self, payload: &str) -> Result<()> {
        self.write_all_retrying(payload.as_bytes())?;
        self.write_all_retrying(b"\n")?;
        loop {
            match self.inner.flush() {
                Ok(()) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            }
        }
        self.emitted += 1;
        trace!(n = self.emitted, len = payload.len(), "symbol emitted");
        Ok(())
    }
}

/// Decoded payloads read one per line.
///
/// Blank lines stand for camera frames in which no symbol was recognized
/// and are skipped. Trailing `\r` and `\n` are stripped.
pub struct LineSource<R> {
    inner: R,
    line: usize,
}

impl<R: BufRead> LineSource<R> {
    /// Create a source reading from `inner`.
    pub fn new(inner: R) -> Self {
        Self { inner, line: 0 }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Consume the source and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> PayloadSource for LineSource<R> {
    fn poll_next(&mut self) -> Result<Option<String>> {
        let mut raw = Vec::new();
        loop {
            raw.clear();
            let read = match self.inner.read_until(b'\n', &mut raw) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ChannelError::Io(err)),
            };
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            while matches!(raw.last(), Some(b'\n' | b'\r')) {
                raw.pop();
            }
            if raw.is_empty() {
                continue;
            }

            return String::from_utf8(std::mem::take(&mut raw))
                .map(Some)
                .map_err(|_| ChannelError::InvalidText { line: self.line });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn sink_writes_one_line_per_payload() {
        let mut sink = LineSink::new(Vec::<u8>::new());
        sink.emit("-----BEGIN MESSAGE-----").unwrap();
        sink.emit("LEN:3").unwrap();

        assert_eq!(sink.emitted(), 2);
        assert_eq!(sink.into_inner(), b"-----BEGIN MESSAGE-----\nLEN:3\n");
    }

    #[test]
    fn source_yields_lines_and_ends() {
        let mut source = LineSource::new(Cursor::new("one\r\ntwo\n"));
        assert_eq!(source.poll_next().unwrap().as_deref(), Some("one"));
        assert_eq!(source.poll_next().unwrap().as_deref(), Some("two"));
        assert!(source.poll_next().unwrap().is_none());
        assert!(source.poll_next().unwrap().is_none());
    }

    #[test]
    fn source_skips_blank_lines() {
        let mut source = LineSource::new(Cursor::new("\n\nLEN:1\n\n"));
        assert_eq!(source.poll_next().unwrap().as_deref(), Some("LEN:1"));
        assert!(source.poll_next().unwrap().is_none());
        assert_eq!(source.line(), 4);
    }

    #[test]
    fn source_without_trailing_newline() {
        let mut source = LineSource::new(Cursor::new("last"));
        assert_eq!(source.poll_next().unwrap().as_deref(), Some("last"));
        assert!(source.poll_next().unwrap().is_none());
    }

    #[test]
    fn source_rejects_invalid_utf8() {
        let mut source = LineSource::new(Cursor::new(vec![b'o', b'k', b'\n', 0xff, b'\n']));
        assert_eq!(source.poll_next().unwrap().as_deref(), Some("ok"));
        let err = source.poll_next().unwrap_err();
        assert!(matches!(err, ChannelError::InvalidText { line: 2 }));
    }

    #[test]
    fn sink_reports_closed_writer() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut sink = LineSink::new(Full);
        assert!(matches!(sink.emit("x"), Err(ChannelError::Closed)));
        assert_eq!(sink.emitted(), 0);
    }

    #[test]
    fn sink_retries_interrupted_writes() {
        struct Flaky {
            interrupted: bool,
            out: Vec<u8>,
        }
        impl Write for Flaky {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.out.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut sink = LineSink::new(Flaky {
            interrupted: false,
            out: Vec::new(),
        });
        sink.emit("RA==").unwrap();
        assert_eq!(sink.get_ref().out, b"RA==\n");
    }
}

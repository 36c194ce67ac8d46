use crate::error::Result;

/// Displays one symbol per payload.
///
/// An implementation encodes `payload` into its visual symbol and shows it.
/// There is no acknowledgement: returning `Ok` only means the symbol was put
/// on screen, never that anyone scanned it.
pub trait SymbolSink {
    /// Encode and display a single payload.
    fn emit(&mut self, payload: &str) -> Result<()>;
}

/// Yields decoded payloads as they are scanned.
///
/// A frame in which no symbol was recognized is simply not reported.
/// `Ok(None)` means the stream has ended and nothing more will arrive.
pub trait PayloadSource {
    /// Block until the next decoded payload is available.
    fn poll_next(&mut self) -> Result<Option<String>>;
}

impl<S: SymbolSink + ?Sized> SymbolSink for &mut S {
    fn emit(&mut self, payload: &str) -> Result<()> {
        (**self).emit(payload)
    }
}

impl<P: PayloadSource + ?Sized> PayloadSource for &mut P {
    fn poll_next(&mut self) -> Result<Option<String>> {
        (**self).poll_next()
    }
}

impl<S: SymbolSink + ?Sized> SymbolSink for Box<S> {
    fn emit(&mut self, payload: &str) -> Result<()> {
        (**self).emit(payload)
    }
}

impl<P: PayloadSource + ?Sized> PayloadSource for Box<P> {
    fn poll_next(&mut self) -> Result<Option<String>> {
        (**self).poll_next()
    }
}

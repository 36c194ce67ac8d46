use crate::error::Result;
use crate::traits::{PayloadSource, SymbolSink};

/// Collects emitted payloads in order.
impl SymbolSink for Vec<String> {
    fn emit(&mut self, payload: &str) -> Result<()> {
        self.push(payload.to_string());
        Ok(())
    }
}

/// A [`PayloadSource`] over any iterator of payloads.
///
/// Handy for feeding synthetic scan sequences (duplicates, gaps, shuffles)
/// into a receiver without a camera.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    inner: I,
}

impl<I: Iterator> IterSource<I> {
    /// Wrap an iterator.
    pub fn new<T: IntoIterator<IntoIter = I>>(inner: T) -> Self {
        Self {
            inner: inner.into_iter(),
        }
    }
}

impl<I> PayloadSource for IterSource<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn poll_next(&mut self) -> Result<Option<String>> {
        Ok(self.inner.next().map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink: Vec<String> = Vec::new();
        sink.emit("a").unwrap();
        sink.emit("b").unwrap();
        assert_eq!(sink, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn iter_source_drains_then_ends() {
        let mut source = IterSource::new(["x", "y"]);
        assert_eq!(source.poll_next().unwrap().as_deref(), Some("x"));
        assert_eq!(source.poll_next().unwrap().as_deref(), Some("y"));
        assert!(source.poll_next().unwrap().is_none());
    }

    #[test]
    fn boxed_source_delegates() {
        let mut source: Box<dyn PayloadSource> = Box::new(IterSource::new(vec!["z".to_string()]));
        assert_eq!(source.poll_next().unwrap().as_deref(), Some("z"));
    }
}

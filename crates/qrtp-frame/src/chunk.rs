use bytes::Bytes;

/// Default chunk size for symbol transfers, in bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 30;

/// Default chunk size for chunk files, in bytes.
pub const DEFAULT_FILE_CHUNK_SIZE: usize = 20;

/// One contiguous slice of a message payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position in the split.
    pub index: u64,
    /// The chunk bytes (a view into the original payload).
    pub data: Bytes,
}

impl Chunk {
    /// Create a chunk.
    pub fn new(index: u64, data: impl Into<Bytes>) -> Self {
        Self {
            index,
            data: data.into(),
        }
    }

    /// Chunk length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the chunk holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Split `payload` into consecutive chunks of at most `chunk_size` bytes.
///
/// A `chunk_size` of zero is treated as one. An empty payload yields no
/// chunks. Chunks share the payload's buffer; nothing is copied.
pub fn split(payload: &Bytes, chunk_size: usize) -> Vec<Chunk> {
    let size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(chunk_count(payload.len(), size));
    let mut offset = 0usize;
    while offset < payload.len() {
        let end = offset.saturating_add(size).min(payload.len());
        chunks.push(Chunk {
            index: chunks.len() as u64,
            data: payload.slice(offset..end),
        });
        offset = end;
    }
    chunks
}

/// Number of chunks [`split`] produces for a payload of `len` bytes.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_has_no_chunks() {
        assert!(split(&Bytes::new(), 5).is_empty());
        assert_eq!(chunk_count(0, 5), 0);
    }

    #[test]
    fn exact_multiple_gives_full_chunks() {
        let payload = Bytes::from_static(b"abcdefghij");
        let chunks = split(&payload, 5);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 5));
    }

    #[test]
    fn remainder_goes_into_last_chunk() {
        let payload = Bytes::from_static(b"HELLO WORLD");
        let chunks = split(&payload, 5);
        let data: Vec<&[u8]> = chunks.iter().map(|c| c.data.as_ref()).collect();
        assert_eq!(data, vec![&b"HELLO"[..], b" WORL", b"D"]);
        assert_eq!(
            chunks.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn zero_chunk_size_is_clamped_to_one() {
        let payload = Bytes::from_static(b"abc");
        let chunks = split(&payload, 0);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[2].data.as_ref(), b"c");
        assert_eq!(chunk_count(3, 0), 3);
    }

    #[test]
    fn chunk_larger_than_payload() {
        let payload = Bytes::from_static(b"tiny");
        let chunks = split(&payload, 1024);
        assert_eq!(chunks, vec![Chunk::new(0, Bytes::from_static(b"tiny"))]);
    }

    #[test]
    fn chunks_concatenate_back_to_payload() {
        let payload = Bytes::from((0u8..=255).collect::<Vec<_>>());
        for size in [1, 7, 30, 255, 256, 300] {
            let joined: Vec<u8> = split(&payload, size)
                .iter()
                .flat_map(|c| c.data.iter().copied())
                .collect();
            assert_eq!(joined, payload.as_ref(), "size {size}");
            assert_eq!(split(&payload, size).len(), chunk_count(256, size));
        }
    }
}

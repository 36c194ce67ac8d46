use bytes::Bytes;
use qrtp_frame::{digest, message_frames, split, Chunk, DigestMode, Frame};

/// A payload prepared for transfer.
///
/// Built once at send time: the chunks and the advertised digest are
/// derived up front and never change.
#[derive(Debug, Clone)]
pub struct Message {
    payload: Bytes,
    chunk_size: usize,
    digest: String,
    chunks: Vec<Chunk>,
}

impl Message {
    /// Prepare `payload` for transfer in chunks of `chunk_size` bytes.
    ///
    /// A `chunk_size` of zero is treated as one.
    pub fn new(payload: impl Into<Bytes>, chunk_size: usize, mode: DigestMode) -> Self {
        let payload = payload.into();
        let chunk_size = chunk_size.max(1);
        let chunks = split(&payload, chunk_size);
        let digest = digest(&payload, mode);
        Self {
            payload,
            chunk_size,
            digest,
            chunks,
        }
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Hex digest advertised in the `HASH` header field.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Every frame of the message, in emission order.
    pub fn frames(&self) -> Vec<Frame> {
        message_frames(&self.chunks, &self.digest)
    }
}

#[cfg(test)]
mod tests {
    use qrtp_frame::encode_frame;

    use super::*;

    #[test]
    fn derives_chunks_and_digest() {
        let msg = Message::new(Bytes::from_static(b"HELLO WORLD"), 5, DigestMode::ByteRepr);
        assert_eq!(msg.chunk_count(), 3);
        assert_eq!(msg.chunk_size(), 5);
        assert_eq!(msg.digest(), "f2378e3d80f8e3f0d576f785b8549ec866c566e9");
        assert_eq!(msg.payload().as_ref(), b"HELLO WORLD");
    }

    #[test]
    fn frames_carry_len_and_hash() {
        let msg = Message::new(b"abc".to_vec(), 2, DigestMode::Raw);
        let wire: Vec<String> = msg.frames().iter().map(encode_frame).collect();
        assert_eq!(wire.len(), 8);
        assert_eq!(wire[2], "LEN:2");
        assert_eq!(wire[3], format!("HASH:{}", msg.digest()));
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let msg = Message::new(b"ab".to_vec(), 0, DigestMode::ByteRepr);
        assert_eq!(msg.chunk_size(), 1);
        assert_eq!(msg.chunk_count(), 2);
    }

    #[test]
    fn empty_message_has_header_only() {
        let msg = Message::new(Bytes::new(), 30, DigestMode::ByteRepr);
        assert!(msg.is_empty());
        assert_eq!(msg.frames().len(), 6);
    }
}

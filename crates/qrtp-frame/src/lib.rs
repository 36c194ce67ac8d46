//! Text frame grammar for moving bytes over a symbol channel.
//!
//! Every symbol carries exactly one frame, and every frame is a short line
//! of printable text:
//! - Four literal markers delimiting the message and its header
//! - `LEN:<n>` and `HASH:<hex>` header fields
//! - `<10-digit index>:<base64>` data frames
//!
//! The same chunker also feeds the chunk-file mode, a headerless sibling
//! format with one base64 line per chunk.

pub mod chunk;
pub mod codec;
pub mod digest;
pub mod error;
pub mod markers;
pub mod reader;
pub mod writer;

pub use chunk::{chunk_count, split, Chunk, DEFAULT_CHUNK_SIZE, DEFAULT_FILE_CHUNK_SIZE};
pub use codec::{
    encode_frame, message_frames, parse_frame, parse_frame_with_config, parse_len, Frame,
    FrameConfig, FrameKind, HeaderField, HeaderKey,
};
pub use digest::{byte_repr, chunk_list_digest, digest, list_repr, verify, DigestMode, Verdict};
pub use error::{FrameError, Result};
pub use markers::{
    DEFAULT_MAX_PAYLOAD_LEN, HASH_KEY, HEADER_BEGIN, HEADER_END, INDEX_WIDTH, LEN_KEY,
    MESSAGE_BEGIN, MESSAGE_END,
};
pub use reader::{decode_chunk_file, ChunkFileReader};
pub use writer::{encode_chunk_file, ChunkFileWriter};

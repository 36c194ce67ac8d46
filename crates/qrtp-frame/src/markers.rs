/// Opens a message.
pub const MESSAGE_BEGIN: &str = "-----BEGIN MESSAGE-----";
/// Closes a message and triggers verification.
pub const MESSAGE_END: &str = "-----END MESSAGE-----";
/// Opens the header block.
pub const HEADER_BEGIN: &str = "-----BEGIN HEADER-----";
/// Closes the header block.
pub const HEADER_END: &str = "-----END HEADER-----";

/// Header field carrying the chunk count.
pub const LEN_KEY: &str = "LEN";
/// Header field carrying the integrity digest.
pub const HASH_KEY: &str = "HASH";

/// Width of the zero-padded decimal index in data frames.
pub const INDEX_WIDTH: usize = 10;

/// Default ceiling for a single scanned payload, in bytes.
pub const DEFAULT_MAX_PAYLOAD_LEN: usize = 4096;

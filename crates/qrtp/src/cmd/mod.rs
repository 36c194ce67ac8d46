use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use qrtp_frame::{DigestMode, DEFAULT_CHUNK_SIZE, DEFAULT_FILE_CHUNK_SIZE, DEFAULT_MAX_PAYLOAD_LEN};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod decode_file;
pub mod encode_file;
pub mod hash;
pub mod preview;
pub mod receive;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Emit a file as a paced run of symbols, one payload per line.
    Send(SendArgs),
    /// Reassemble a message from scanned payloads, one per line.
    Receive(ReceiveArgs),
    /// Show a sample symbol and the largest data frame for a chunk size.
    Preview(PreviewArgs),
    /// Write a file as base64 chunk lines.
    EncodeFile(EncodeFileArgs),
    /// Rebuild a file from base64 chunk lines.
    DecodeFile(DecodeFileArgs),
    /// Print the integrity digest of a file.
    Hash(HashArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Receive(args) => receive::run(args, format),
        Command::Preview(args) => preview::run(args, format),
        Command::EncodeFile(args) => encode_file::run(args, format),
        Command::DecodeFile(args) => decode_file::run(args, format),
        Command::Hash(args) => hash::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// File to send.
    pub input: PathBuf,
    /// Chunk size in bytes.
    #[arg(long, short = 's', default_value_t = DEFAULT_CHUNK_SIZE)]
    pub size: usize,
    /// Pause between symbols (e.g. 200ms, 1s, 0).
    #[arg(long, default_value = "200ms")]
    pub pacing: String,
    /// Write symbols to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
    /// Advertise SHA-1 of the raw bytes instead of the byte-string literal.
    #[arg(long)]
    pub raw_digest: bool,
}

#[derive(Args, Debug)]
pub struct ReceiveArgs {
    /// File the reassembled payload is written to.
    pub destination: PathBuf,
    /// Read scanned payloads from this file. Default: stdin.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
    /// Abort when no frame makes progress for this long (e.g. 30s).
    #[arg(long)]
    pub idle_timeout: Option<String>,
    /// Keep receiving messages until the input ends or Ctrl-C.
    #[arg(long = "loop")]
    pub repeat: bool,
    /// Expect SHA-1 of the raw bytes instead of the byte-string literal.
    #[arg(long)]
    pub raw_digest: bool,
    /// Reject payloads longer than this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_LEN)]
    pub max_payload: usize,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Chunk size used to size the largest data frame.
    #[arg(long, short = 's', default_value_t = DEFAULT_CHUNK_SIZE)]
    pub size: usize,
}

#[derive(Args, Debug)]
pub struct EncodeFileArgs {
    /// File to encode.
    pub input: PathBuf,
    /// Chunk size in bytes.
    #[arg(long, short = 's', default_value_t = DEFAULT_FILE_CHUNK_SIZE)]
    pub size: usize,
    /// Output path. Default: `<input>.chunks`.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeFileArgs {
    /// Chunk file to decode.
    pub input: PathBuf,
    /// Output path. Default: `reconstructed-<name>` next to the input.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// File to hash.
    pub input: PathBuf,
    /// Hash the raw bytes instead of the byte-string literal.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `"Ns"`, `"Nms"` or bare seconds.
pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

/// Like [`parse_duration`], rejecting zero.
pub(crate) fn parse_timeout(input: &str) -> CliResult<Duration> {
    let duration = parse_duration(input)?;
    if duration.is_zero() {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }
    Ok(duration)
}

pub(crate) fn check_chunk_size(size: usize) -> CliResult<usize> {
    if size == 0 {
        return Err(CliError::new(USAGE, "chunk size must be at least 1"));
    }
    Ok(size)
}

pub(crate) fn digest_mode(raw: bool) -> DigestMode {
    if raw {
        DigestMode::Raw
    } else {
        DigestMode::ByteRepr
    }
}

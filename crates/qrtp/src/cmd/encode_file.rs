use std::ffi::OsString;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use qrtp_frame::{chunk_list_digest, digest, encode_chunk_file, split, DigestMode};
use serde::Serialize;
use tracing::info;

use crate::cmd::{check_chunk_size, EncodeFileArgs};
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{human_bytes, print_report, OutputFormat, Report};

#[derive(Serialize)]
struct EncodeOutput {
    schema_id: &'static str,
    input: String,
    output: String,
    bytes: usize,
    chunk_size: usize,
    chunks: usize,
    chunks_hash: String,
    data_hash: String,
}

impl Report for EncodeOutput {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("input", self.input.clone()),
            ("output", self.output.clone()),
            ("size", human_bytes(self.bytes)),
            ("chunk_size", self.chunk_size.to_string()),
            ("chunks", self.chunks.to_string()),
            ("chunks_hash", self.chunks_hash.clone()),
            ("data_hash", self.data_hash.clone()),
        ]
    }
}

pub fn run(args: EncodeFileArgs, format: OutputFormat) -> CliResult<i32> {
    let chunk_size = check_chunk_size(args.size)?;
    let payload = Bytes::from(
        fs::read(&args.input)
            .map_err(|err| io_error(&format!("read {}", args.input.display()), err))?,
    );
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));

    let file = File::create(&output)
        .map_err(|err| io_error(&format!("create {}", output.display()), err))?;
    let chunks = encode_chunk_file(&payload, chunk_size, BufWriter::new(file))
        .map_err(|err| frame_error(&format!("write {}", output.display()), err))?;
    info!(output = %output.display(), chunks, "chunks written");

    let out = EncodeOutput {
        schema_id: "qrtp/cli/v1/encode-file",
        input: args.input.display().to_string(),
        output: output.display().to_string(),
        bytes: payload.len(),
        chunk_size,
        chunks,
        chunks_hash: chunk_list_digest(&split(&payload, chunk_size)),
        data_hash: digest(&payload, DigestMode::ByteRepr),
    };
    print_report(&out, format);
    Ok(SUCCESS)
}

/// `<input>.chunks`, keeping any existing extension.
fn default_output(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".chunks");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_appends_suffix() {
        assert_eq!(
            default_output(Path::new("/tmp/photo.jpg")),
            PathBuf::from("/tmp/photo.jpg.chunks")
        );
        assert_eq!(default_output(Path::new("notes")), PathBuf::from("notes.chunks"));
    }
}

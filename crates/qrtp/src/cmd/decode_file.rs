use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use qrtp_frame::{decode_chunk_file, digest, DigestMode};
use serde::Serialize;
use tracing::info;

use crate::cmd::DecodeFileArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{human_bytes, print_report, OutputFormat, Report};

#[derive(Serialize)]
struct DecodeOutput {
    schema_id: &'static str,
    input: String,
    output: String,
    bytes: usize,
    data_hash: String,
}

impl Report for DecodeOutput {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("input", self.input.clone()),
            ("output", self.output.clone()),
            ("size", human_bytes(self.bytes)),
            ("data_hash", self.data_hash.clone()),
        ]
    }
}

pub fn run(args: DecodeFileArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.input)
        .map_err(|err| io_error(&format!("open {}", args.input.display()), err))?;
    let data = decode_chunk_file(BufReader::new(file))
        .map_err(|err| frame_error(&format!("decode {}", args.input.display()), err))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    fs::write(&output, &data)
        .map_err(|err| io_error(&format!("write {}", output.display()), err))?;
    info!(output = %output.display(), bytes = data.len(), "file reconstructed");

    let out = DecodeOutput {
        schema_id: "qrtp/cli/v1/decode-file",
        input: args.input.display().to_string(),
        output: output.display().to_string(),
        bytes: data.len(),
        data_hash: digest(&data, DigestMode::ByteRepr),
    };
    print_report(&out, format);
    Ok(SUCCESS)
}

/// `reconstructed-<name>` beside the input, with `.chunks` dropped from the name.
fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().replace(".chunks", ""))
        .unwrap_or_default();
    let file_name = format!("reconstructed-{name}");
    match input.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

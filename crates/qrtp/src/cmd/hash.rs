use std::fs;

use qrtp_frame::{digest, DigestMode};
use serde::Serialize;

use crate::cmd::{digest_mode, HashArgs};
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

#[derive(Serialize)]
struct HashOutput {
    schema_id: &'static str,
    input: String,
    bytes: usize,
    mode: DigestMode,
    hash: String,
}

impl Report for HashOutput {
    fn rows(&self) -> Vec<(&'static str, String)> {
        let mode = match self.mode {
            DigestMode::ByteRepr => "byte_repr",
            DigestMode::Raw => "raw",
        };
        vec![
            ("input", self.input.clone()),
            ("bytes", self.bytes.to_string()),
            ("mode", mode.to_string()),
            ("hash", self.hash.clone()),
        ]
    }
}

pub fn run(args: HashArgs, format: OutputFormat) -> CliResult<i32> {
    let data = fs::read(&args.input)
        .map_err(|err| io_error(&format!("read {}", args.input.display()), err))?;
    let mode = digest_mode(args.raw);

    let out = HashOutput {
        schema_id: "qrtp/cli/v1/hash",
        input: args.input.display().to_string(),
        bytes: data.len(),
        mode,
        hash: digest(&data, mode),
    };
    print_report(&out, format);
    Ok(SUCCESS)
}

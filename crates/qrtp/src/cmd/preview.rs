use qrtp_frame::{encode_frame, Frame};
use serde::Serialize;

use crate::cmd::{check_chunk_size, PreviewArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

/// Shown so the operator can line up the camera before a transfer.
pub const SAMPLE_SYMBOL: &str = "QrTP Rocks!";

#[derive(Serialize)]
struct PreviewOutput {
    schema_id: &'static str,
    sample: &'static str,
    chunk_size: usize,
    largest_frame: String,
    largest_frame_len: usize,
}

impl Report for PreviewOutput {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("sample", self.sample.to_string()),
            ("chunk_size", self.chunk_size.to_string()),
            ("largest_frame", self.largest_frame.clone()),
            ("largest_frame_len", self.largest_frame_len.to_string()),
        ]
    }
}

pub fn run(args: PreviewArgs, format: OutputFormat) -> CliResult<i32> {
    let chunk_size = check_chunk_size(args.size)?;
    let largest_frame = largest_data_frame(chunk_size);
    let out = PreviewOutput {
        schema_id: "qrtp/cli/v1/preview",
        sample: SAMPLE_SYMBOL,
        chunk_size,
        largest_frame_len: largest_frame.len(),
        largest_frame,
    };
    print_report(&out, format);
    Ok(SUCCESS)
}

/// Wire text of a full data frame; every data symbol fits within it.
fn largest_data_frame(chunk_size: usize) -> String {
    encode_frame(&Frame::data(0, vec![b'A'; chunk_size]))
}

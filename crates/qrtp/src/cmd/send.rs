use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

use bytes::Bytes;
use qrtp_channel::{LineSink, SymbolSink};
use qrtp_frame::DigestMode;
use qrtp_session::{SendReport, SenderConfig, SenderSession};
use serde::Serialize;
use tracing::debug;

use crate::cmd::{check_chunk_size, digest_mode, parse_duration, SendArgs};
use crate::exit::{io_error, send_error, CliResult, SUCCESS};
use crate::output::{human_bytes, print_report, OutputFormat, Report};

#[derive(Serialize)]
struct SendOutput {
    schema_id: &'static str,
    input: String,
    output: String,
    digest_mode: DigestMode,
    pacing_ms: u128,
    #[serde(flatten)]
    report: SendReport,
}

impl Report for SendOutput {
    fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("input", self.input.clone()),
            ("output", self.output.clone()),
            ("size", human_bytes(self.report.bytes)),
            ("chunk_size", self.report.chunk_size.to_string()),
            ("chunks", self.report.chunks.to_string()),
            ("frames", self.report.frames.to_string()),
            ("pacing_ms", self.pacing_ms.to_string()),
            ("hash", self.report.hash.clone()),
        ]
    }
}

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let chunk_size = check_chunk_size(args.size)?;
    let pacing = parse_duration(&args.pacing)?;
    let payload = fs::read(&args.input)
        .map_err(|err| io_error(&format!("read {}", args.input.display()), err))?;

    let config = SenderConfig {
        chunk_size,
        pacing,
        digest: digest_mode(args.raw_digest),
    };
    let session = SenderSession::new(Bytes::from(payload), config)
        .map_err(|err| send_error(&format!("send {}", args.input.display()), err))?;
    debug!(input = %args.input.display(), chunk_size, ?pacing, "sender ready");

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| io_error(&format!("create {}", path.display()), err))?;
            let report = emit(&session, LineSink::new(BufWriter::new(file)))?;
            let out = SendOutput {
                schema_id: "qrtp/cli/v1/send-report",
                input: display(&args.input),
                output: display(path),
                digest_mode: session.config().digest,
                pacing_ms: pacing.as_millis(),
                report,
            };
            print_report(&out, format);
        }
        // Symbols own stdout; the summary goes to the log only.
        None => {
            emit(&session, LineSink::new(io::stdout().lock()))?;
        }
    }

    Ok(SUCCESS)
}

fn emit<S: SymbolSink>(session: &SenderSession, mut sink: S) -> CliResult<SendReport> {
    session
        .send(&mut sink)
        .map_err(|err| send_error("send", err))
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use qrtp_channel::{LineSource, PayloadSource};
use qrtp_frame::FrameConfig;
use qrtp_session::{
    receive, receive_with_cancel, CancelHandle, Phase, ReceiverConfig, Received, SessionError,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cmd::{digest_mode, parse_timeout, ReceiveArgs};
use crate::exit::{
    channel_error, io_error, session_error, CliError, CliResult, FAILURE, INTEGRITY_MISMATCH,
    INTERNAL, INTERRUPTED, SUCCESS,
};
use crate::output::{human_bytes, print_report, OutputFormat, Report};

#[derive(Serialize)]
struct ReceiveOutput<'a> {
    schema_id: &'static str,
    destination: String,
    message: usize,
    #[serde(flatten)]
    received: &'a Received,
}

impl Report for ReceiveOutput<'_> {
    fn rows(&self) -> Vec<(&'static str, String)> {
        let received = self.received;
        let verdict = if received.verdict.is_match() {
            "match".to_string()
        } else {
            "MISMATCH".to_string()
        };
        let mut rows = vec![
            ("destination", self.destination.clone()),
            ("message", self.message.to_string()),
            ("size", human_bytes(received.size)),
            (
                "chunks",
                format!("{}/{}", received.chunks, received.header.chunk_count),
            ),
            ("duplicates", received.duplicates.to_string()),
            ("hash", received.header.hash.clone()),
            ("verdict", verdict),
        ];
        for anomaly in &received.anomalies {
            rows.push(("anomaly", anomaly.to_string()));
        }
        rows
    }
}

pub fn run(args: ReceiveArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ReceiverConfig {
        frame: FrameConfig {
            max_payload_len: args.max_payload,
        },
        digest: digest_mode(args.raw_digest),
        idle_timeout: args.idle_timeout.as_deref().map(parse_timeout).transpose()?,
    };

    let mut source = LineSource::new(open_input(args.input.as_deref())?);
    let file = File::create(&args.destination).map_err(|err| {
        io_error(&format!("create {}", args.destination.display()), err)
    })?;
    let mut destination = Destination {
        path: args.destination.display().to_string(),
        writer: BufWriter::new(file),
        messages: 0,
    };

    if !args.repeat {
        let received =
            receive(&mut source, &config).map_err(|err| session_error("receive", err))?;
        return destination.deliver(&received, format);
    }

    receive_loop(&mut source, &config, &mut destination, format)
}

/// Receive messages back to back, appending each to the destination.
///
/// A message that fails is abandoned and the loop waits for the next
/// message start. Ends cleanly when the input runs out between messages.
/// Ctrl-C exits with `INTERRUPTED`.
fn receive_loop<P: PayloadSource>(
    source: &mut P,
    config: &ReceiverConfig,
    destination: &mut Destination,
    format: OutputFormat,
) -> CliResult<i32> {
    let cancel = CancelHandle::new();
    install_ctrlc_handler(cancel.clone())?;

    let mut code = SUCCESS;
    loop {
        match receive_with_cancel(source, config, &cancel) {
            Ok(received) => {
                if destination.deliver(&received, format)? != SUCCESS && code == SUCCESS {
                    code = INTEGRITY_MISMATCH;
                }
            }
            Err(SessionError::StreamEnded {
                state: Phase::AwaitingStart,
            }) => break,
            Err(SessionError::StreamEnded { state }) => {
                warn!(%state, "input ended mid-message");
                if code == SUCCESS {
                    code = FAILURE;
                }
                break;
            }
            Err(SessionError::Cancelled { .. }) => {
                info!(messages = destination.messages, "receive loop interrupted");
                return Ok(INTERRUPTED);
            }
            Err(SessionError::Channel(err)) => return Err(channel_error("receive", err)),
            Err(err @ SessionError::TimedOut { .. }) => return Err(session_error("receive", err)),
            Err(err) if err.is_stray() => {
                debug!(error = %err, "ignoring payload outside a message");
            }
            Err(err) => {
                warn!(error = %err, "message abandoned, waiting for the next one");
            }
        }
    }

    Ok(code)
}

struct Destination {
    path: String,
    writer: BufWriter<File>,
    messages: usize,
}

impl Destination {
    /// Write the payload (even when the digest failed) and report it.
    fn deliver(&mut self, received: &Received, format: OutputFormat) -> CliResult<i32> {
        self.writer
            .write_all(&received.data)
            .and_then(|()| self.writer.flush())
            .map_err(|err| io_error(&format!("write {}", self.path), err))?;
        self.messages += 1;

        print_report(
            &ReceiveOutput {
                schema_id: "qrtp/cli/v1/receive-report",
                destination: self.path.clone(),
                message: self.messages,
                received,
            },
            format,
        );

        if received.verdict.is_match() {
            Ok(SUCCESS)
        } else {
            warn!(destination = %self.path, "payload written despite checksum failure");
            Ok(INTEGRITY_MISMATCH)
        }
    }
}

fn open_input(path: Option<&Path>) -> CliResult<Box<dyn BufRead>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("open {}", path.display()), err))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Mid-message, the first Ctrl-C stops the loop at the next payload.
/// Otherwise exit at once: a read blocked on idle input resumes after the
/// signal and would never see the flag.
fn install_ctrlc_handler(cancel: CancelHandle) -> CliResult<()> {
    ctrlc::set_handler(move || {
        if cancel.is_cancelled() || !cancel.in_message() {
            std::process::exit(INTERRUPTED);
        }
        cancel.cancel();
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

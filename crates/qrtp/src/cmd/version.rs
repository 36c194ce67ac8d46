use qrtp_frame::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_PAYLOAD_LEN};
use qrtp_session::DEFAULT_PACING;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("qrtp {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: qrtp");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("QRTP_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("digest: sha1 (byte-string literal)");
    println!("chunk_size_default: {DEFAULT_CHUNK_SIZE}");
    println!("pacing_default_ms: {}", DEFAULT_PACING.as_millis());
    println!("max_payload_default: {DEFAULT_MAX_PAYLOAD_LEN}");

    Ok(SUCCESS)
}

use std::fs;
use std::io::Read;

use bytes::Bytes;
use muldem_core::{IdentityRouter, Muldem};
use muldem_frame::{framed, FrameEnvelope};
use serde_json::Value;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, muldem_error, CliResult, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let message = Bytes::from(read_input(&args)?);

    // Decoding never routes, so any router will do.
    let muldem: Muldem<Value, Bytes> = framed(IdentityRouter::default());
    let payload = muldem
        .demultiplex(&message)
        .map_err(|err| muldem_error("decode failed", err))?;

    let frame = FrameEnvelope::default()
        .decapsulate_routed(&message)
        .map_err(|err| muldem_error("decode failed", err))?;

    print_decoded(&frame.route, &frame.payload, &payload, format);
    Ok(SUCCESS)
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    match &args.input {
        Some(path) => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(buf)
        }
    }
}

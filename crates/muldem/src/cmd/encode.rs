use std::fs;

use muldem_frame::HEADER_SIZE;
use serde_json::Value;
use tracing::info;

use crate::cmd::{framed_pipeline, EncodeArgs};
use crate::exit::{io_error, muldem_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = resolve_payload(&args)?;
    let muldem = framed_pipeline(&args.routing)?;

    let message = if args.routing.strict {
        muldem.try_multiplex(&args.address, &payload)
    } else {
        muldem.multiplex(&args.address, &payload)
    }
    .map_err(|err| muldem_error("encode failed", err))?;
    let route = muldem.route(&args.address);
    let payload_size = message.len().saturating_sub(HEADER_SIZE + route.address.len());

    let written_to = match &args.output {
        Some(path) => {
            fs::write(path, &message).map_err(|err| {
                io_error(&format!("failed writing {}", path.display()), err)
            })?;
            info!(path = %path.display(), size = message.len(), "wrote frame");
            Some(path.display().to_string())
        }
        None => None,
    };

    print_encoded(&route, payload_size, &message, written_to.as_deref(), format);
    Ok(SUCCESS)
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Value> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(path) = &args.file {
        let bytes = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return serde_json::from_slice(&bytes).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("{} is not valid JSON: {err}", path.display()),
            )
        });
    }
    Err(CliError::new(USAGE, "one of --json or --file is required"))
}

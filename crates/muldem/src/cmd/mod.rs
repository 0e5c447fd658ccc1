use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use muldem_core::{IdentityRouter, Medium, Muldem, PrefixRouter, RouteTable};
use muldem_frame::framed;
use serde_json::Value;
use tracing::debug;

use crate::exit::{routing_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod route;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve an address to its medium.
    Route(RouteArgs),
    /// Multiplex a JSON payload into a frame.
    Encode(EncodeArgs),
    /// Demultiplex a frame and print its route and payload.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Route(args) => route::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct RoutingArgs {
    /// JSON routing table. Without one every address goes to --medium.
    #[arg(long, value_name = "FILE", env = "MULDEM_ROUTES")]
    pub routes: Option<PathBuf>,
    /// Medium for every address when no routing table is given.
    #[arg(long, default_value = "0", conflicts_with = "routes")]
    pub medium: u16,
    /// Fail on addresses no routing rule matches instead of using the fallback medium.
    #[arg(long, requires = "routes")]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Logical address to resolve.
    pub address: String,
    #[command(flatten)]
    pub routing: RoutingArgs,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Logical destination address.
    pub address: String,
    /// JSON payload.
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the JSON payload from a file.
    #[arg(long, value_name = "FILE", conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Write the frame to a file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub routing: RoutingArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Read the frame from a file. Default: stdin.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// JSON pipeline in a frame envelope, routed by the table at `routes` when given.
pub(crate) fn framed_pipeline(routing: &RoutingArgs) -> CliResult<Muldem<Value, Bytes>> {
    match routing.routes.as_deref() {
        Some(path) => {
            let router = load_router(path)?;
            Ok(framed(router))
        }
        None => Ok(framed(IdentityRouter::new(Medium::new(routing.medium)))),
    }
}

fn load_router(path: &Path) -> CliResult<PrefixRouter> {
    let context = format!("failed loading routes from {}", path.display());
    let table = RouteTable::from_path(path).map_err(|err| routing_error(&context, err))?;
    let router = PrefixRouter::new(table).map_err(|err| routing_error(&context, err))?;
    debug!(path = %path.display(), fallback = %router.fallback(), "loaded routing table");
    Ok(router)
}

use muldem_frame::VERSION;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("muldem {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: muldem");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("frame_version: {VERSION}");
    println!(
        "target: {}",
        option_env!("MULDEM_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("features: http={}, cli=true", cfg!(feature = "http"));

    Ok(SUCCESS)
}

use crate::cmd::{framed_pipeline, RouteArgs};
use crate::exit::{muldem_error, CliResult, SUCCESS};
use crate::output::{print_route, OutputFormat};

pub fn run(args: RouteArgs, format: OutputFormat) -> CliResult<i32> {
    let muldem = framed_pipeline(&args.routing)?;
    let route = if args.routing.strict {
        muldem
            .try_route(&args.address)
            .map_err(|err| muldem_error("route failed", err))?
    } else {
        muldem.route(&args.address)
    };
    print_route(&route, format);
    Ok(SUCCESS)
}

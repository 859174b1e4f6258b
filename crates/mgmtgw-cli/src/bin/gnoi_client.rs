//! Send one gNOI RPC to the gateway and print the response as JSON.

use clap::Parser;

use mgmtgw_cli::{call, init_tracing, parse_duration, Module, TargetArgs};

#[derive(Parser, Debug)]
#[command(name = "gnoi-client")]
#[command(version, about = "Send one gNOI RPC to the management gateway")]
struct Args {
    /// Service the RPC belongs to
    #[arg(long, value_enum, ignore_case = true, default_value = "system")]
    module: Module,

    /// RPC to call, e.g. Time, Sum, ImageInstall, Authenticate
    #[arg(long, default_value = "Time")]
    rpc: String,

    /// Request body as JSON
    #[arg(long, default_value = "")]
    jsonin: String,

    /// Request timeout, e.g. 10s
    #[arg(long, default_value = "10s", value_parser = parse_duration)]
    time_out: std::time::Duration,

    #[command(flatten)]
    target: TargetArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let client = args.target.connect(args.time_out).await?;
    let response = call(&client, args.module, &args.rpc, &args.jsonin).await?;
    println!("{}", response);
    Ok(())
}

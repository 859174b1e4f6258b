//! Build a gNMI Set from xpaths, send it, and print request and response.

use clap::Parser;

use mgmtgw_cli::{init_tracing, parse_duration, SetOps, TargetArgs};

#[derive(Parser, Debug)]
#[command(name = "gnmi-set")]
#[command(version, about = "Apply a gNMI Set through the management gateway")]
struct Args {
    #[command(flatten)]
    ops: SetOps,

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

    let request = args.ops.request()?;
    println!("== setRequest:\n{}", serde_json::to_string_pretty(&request)?);

    let client = args.target.connect(args.time_out).await?;
    let response = client.set(request).await?;
    println!("== setResponse:\n{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

//! wxmap CLI - replay weather region map scenarios offline.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wxmap-cli",
    version,
    about = "Weather region map scenario toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wxmap_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    wxmap_cmd::run(cli.command).await
}

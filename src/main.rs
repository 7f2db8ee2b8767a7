use anyhow::Result;
use clap::Parser;
use enroll::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    enroll::logging::init(cli.verbose);
    cli.run().await
}

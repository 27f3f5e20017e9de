use clap::Parser;
use firm_content_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Sheet(args) => cli::sheet::run(args).await,
        Command::Locations(args) => cli::locations::run(args).await,
    }
}

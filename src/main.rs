use asset_cache_proxy::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => cli::serve::run().await,
        Command::Install => cli::cache::install().await,
        Command::Activate => cli::cache::activate().await,
        Command::Caches => cli::cache::list().await,
    }
}

mod cmd;
mod config;
mod error;

use clap::Parser;
use config::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Verify(ref args) => cmd::verify::run(&cli.global, args).await,
        Commands::Load(ref args) => cmd::load::run(&cli.global, args).await,
        Commands::Seed(ref args) => cmd::seed::run(&cli.global, args).await,
        Commands::Frame(ref args) => cmd::frame::run(&cli.global, args).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

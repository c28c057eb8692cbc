//! Postboard Server Entry Point

use clap::Parser;
use postboard::cli::{Cli, Commands};
use postboard::config::ServerConfig;
use postboard::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match cli.command {
        Some(Commands::Serve(args)) => postboard::cli::serve::execute(&args).await,
        Some(Commands::Prune(args)) => postboard::cli::prune::execute(&args).await,
        Some(Commands::Posts(args)) => postboard::cli::posts::execute(&args).await,
        Some(Commands::Audit(args)) => postboard::cli::audit::execute(&args).await,
        // No subcommand - default to serve
        None => postboard::cli::serve::run(ServerConfig::from_env()).await,
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

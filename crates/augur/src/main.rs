mod cli;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    dispatch(cli.command)
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze {
            request,
            config,
            output,
            pretty,
        } => cli::analyze::run(&request, config.as_deref(), output, pretty),
        Commands::Extract {
            path,
            config,
            pretty,
        } => cli::extract::run(&path, config.as_deref(), pretty),
        Commands::Config => cli::config::run(),
    }
}

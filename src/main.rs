use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use build_version::{VersionResolver, cli::Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the version
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.log_filter()))
        .with_writer(std::io::stderr)
        .init();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let version = VersionResolver::new().resolve(&cli.options()).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&version)?);
    } else {
        println!("{version}");
    }

    Ok(())
}

//! CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use preflight_cli::Cli;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env before reading RUST_LOG or any override
    dotenvy::dotenv().ok();

    let Cli {} = Cli::parse();
    init_tracing();

    let code = match preflight_cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };
    std::process::exit(code);
}

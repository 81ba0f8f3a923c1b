// src/main.rs — Miles entry point

use clap::Parser;

use miles::cli::{chat, doctor, Cli, Commands};
use miles::context::ContextResolver;
use miles::infra::config::Config;
use miles::infra::logger;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match cli.command {
        Some(Commands::Doctor) => doctor::run_doctor(&config).await,
        Some(Commands::Context) => print_context(&config, cli.no_location).await,
        Some(Commands::Chat) | None => chat::run_chat(&config, cli.no_tui, cli.no_location).await,
    }
}

async fn print_context(config: &Config, no_location: bool) -> anyhow::Result<()> {
    let mut resolver = ContextResolver::new(&config.geocoder);
    if config.geocoder.enabled && !no_location {
        resolver = resolver.with_geolocation(miles::context::system_geolocation());
    }
    let context = resolver.resolve().await;
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(())
}

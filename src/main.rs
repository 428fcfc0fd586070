//! Ollama-Search-RS: answer questions with a local model and live web context
//!
//! This is the main entry point for the web front end.

use anyhow::{bail, Result};
use ollama_search_rs::{config, web};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = match parse_args(std::env::args().skip(1))? {
        Command::Run { config } => config,
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Version => {
            println!("ollama-search-rs {}", ollama_search_rs::VERSION);
            return Ok(());
        }
    };

    let source = config::locate(config_path.as_deref());
    let settings = config::load_path(source.as_deref())?;

    // Initialize logging; RUST_LOG wins over the debug flag
    let default_level = if settings.general.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Ollama-Search-RS v{}", ollama_search_rs::VERSION);
    match &source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    info!(
        "Models: {} (search engine: {})",
        settings.ollama.models.join(", "),
        settings.search.engine
    );

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let state = web::AppState::from_settings(settings)?;
    let app = web::create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run { config: Option<PathBuf> },
    Help,
    Version,
}

fn parse_args<I>(args: I) -> Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut config = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("{} expects a file path", arg),
            },
            other => bail!("unknown argument: {} (try --help)", other),
        }
    }

    Ok(Command::Run { config })
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
Ollama-Search-RS v{}
Answer questions with a local Ollama model and live web search context

USAGE:
    ollama-search-rs [OPTIONS]

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    ASSISTANT_SETTINGS_PATH  Path to settings.yml
    ASSISTANT_DEBUG          Enable debug logging (true/false)
    ASSISTANT_PORT           Server port
    ASSISTANT_BIND_ADDRESS   Bind address
    ASSISTANT_OLLAMA_URL     Ollama base URL
    ASSISTANT_MODELS         Comma-separated model list
    RUST_LOG                 Log filter
"#,
        ollama_search_rs::VERSION
    );
}

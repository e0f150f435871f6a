//! Extract Fetcher CLI application
//!
//! Command-line interface for listing and downloading data extract files from
//! a remote catalog.

use std::process;

use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use extract_fetcher::cli::{handle_download, handle_list, Cli, Commands};
use extract_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        debug!(category = e.category(), "Run failed: {:?}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(&cli);

    info!("Extract Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::List => handle_list(cli.global).await,
        Commands::Download(args) => handle_download(cli.global, args).await,
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("extract_fetcher={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nifty_stocks::api::ScreenerClient;
use nifty_stocks::concurrent_fetcher::QuoteFetcher;
use nifty_stocks::models::Config;
use nifty_stocks::report::{self, OutputFormat};
use nifty_stocks::ui::{self, DashboardState};

#[derive(Parser, Debug)]
#[command(version, about = "NIFTY 50 stock prices and PE ratios from Screener", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive dashboard (default)
    Dashboard,
    /// Fetch once and print the snapshot
    Fetch {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Dashboard);

    // Keep the dashboard's alternate screen clean unless RUST_LOG asks otherwise
    let default_filter = match command {
        Command::Dashboard => "nifty_stocks=error",
        Command::Fetch { .. } => "nifty_stocks=info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with_writer(io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("❌ Configuration Error: {}", e);
            std::process::exit(1);
        }
    };

    match command {
        Command::Dashboard => {
            if let Err(e) = ui::run_app(config).await {
                eprintln!("❌ TUI Error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Fetch { format } => run_fetch(config, format).await?,
    }

    Ok(())
}

/// One refresh, printed to stdout
async fn run_fetch(config: Config, format: OutputFormat) -> Result<()> {
    let source = Arc::new(ScreenerClient::new(&config)?);
    let fetcher = QuoteFetcher::from_config(source, &config);

    info!("📊 Fetching stock prices and PE ratios for {} tickers", config.tickers.len());
    let results = fetcher.fetch_all(&config.tickers).await;

    let mut state = DashboardState::new();
    match state.apply_refresh(&config.tickers, results) {
        Ok(quote_set) => {
            report::write_report(&mut io::stdout().lock(), quote_set, format)?;
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
    }
}

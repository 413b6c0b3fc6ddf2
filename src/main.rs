use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use env_logger::Target;
use log::{info, LevelFilter};

use spendview::api::ApiClient;
use spendview::app::App;
use spendview::cli::{self, CliCommand};
use spendview::config::{default_log_path, Config};
use spendview::errors::SpendviewError;
use spendview::tui;

/// Terminal client for the expense service. Without a subcommand the
/// full-screen view is opened.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
    /// Configuration file, defaults to the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of the expense service
    #[arg(long, env = "SPENDVIEW_API_URL")]
    api_url: Option<String>,
    /// Request timeout in seconds
    #[arg(long, env = "SPENDVIEW_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
    #[arg(short, long)]
    debug: bool,
}

/// Logs go to stderr, except under the full-screen view where they go to the
/// log file.
fn init_logging(debug: bool, to_file: bool) -> Result<(), SpendviewError> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .format_module_path(false);

    if to_file {
        match default_log_path() {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    fs::create_dir_all(dir)?;
                }
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                builder.target(Target::Pipe(Box::new(file)));
            }
            None => {
                builder.target(Target::Pipe(Box::new(io::sink())));
            }
        }
    }

    builder.try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), SpendviewError> {
    let args = Args::parse();
    init_logging(args.debug, args.command.is_none())?;

    let config =
        Config::load(args.config.as_deref())?.with_overrides(args.api_url, args.timeout_secs)?;
    let client = ApiClient::new(&config)?;
    info!("Using expense service at {}", client.base_url());

    match args.command {
        None => tui::run(App::new(), Arc::new(client), &config).await,
        Some(command) => cli::run(command, &client, &config.currency, &mut io::stdout()).await,
    }
}

use burnrate::args::{Args, Command};
use burnrate::{commands, Config, Mode};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> anyhow::Result<()> {
    trace!("{args:?}");

    // Reads the API key (if any) exactly once; nothing downstream touches
    // the environment for credentials.
    let config = Config::from_env();

    // This allows running the program without hitting the chat-completion
    // API. When BURNRATE_IN_TEST_MODE is set and non-zero in length the mode
    // will be Mode::Test, otherwise it will be Mode::Live.
    let mode = Mode::from_env();

    // Route to the appropriate command handler
    let _: () = match args.command() {
        Command::Analyze(analyze_args) => {
            commands::analyze(config, mode, analyze_args.clone())
                .await?
                .print()
        }
        Command::Sheets(sheets_args) => commands::sheets(sheets_args.clone()).await?.print(),
        Command::Sample(sample_args) => commands::sample(sample_args.clone()).await?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

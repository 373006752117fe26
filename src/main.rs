use clap::Parser;
use tracing_subscriber::EnvFilter;

use progline::cli;
use progline::error::Result;
use progline::progress::TraceSwitch;

use progline::cli::Args;
use progline::config::load_display_config;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_app(args: Args) -> Result<()> {
    let mut config = load_display_config()?;
    args.display.apply(&mut config);
    init_logging(config.trace);

    let trace = TraceSwitch::new(config.trace);
    cli::run(args, config, trace).await?;
    Ok(())
}

// Logs share stderr with the progress line, which stays hidden while tracing.
fn init_logging(trace: bool) {
    let default_level = if trace { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

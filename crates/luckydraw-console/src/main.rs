//! Lucky Draw console entry point.

use std::error::Error;

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use luckydraw_console::config::ConsoleConfig;
use luckydraw_console::console;
use luckydraw_console::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so they never interleave with the rolling display.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Lucky Draw console");

    let config = ConsoleConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    let input = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let status = console::run(state, &config, input, &mut stdout).await?;

    tracing::info!(
        engine_id = %status.engine_id,
        remaining = status.remaining,
        drawn = status.drawn.len(),
        "session ended"
    );

    Ok(())
}

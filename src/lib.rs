pub mod cli;
pub mod core;
pub mod providers;

use crate::core::AppConfig;
use anyhow::Result;
use std::io::Write;
use tokio::io::AsyncBufRead;
use tracing::{debug, info};

/// Runs the interactive session against stdin/stdout.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("Rate monitor starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let mut input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    run_session(&config, &mut input, &mut output, true).await
}

/// Runs the session with explicit input and output streams.
pub async fn run_session<R, W>(
    config: &AppConfig,
    input: &mut R,
    output: &mut W,
    show_progress: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let provider = providers::ExchangeRateApiProvider::new(&config.provider.base_url)?;
    cli::Session::new(&provider, config)
        .with_progress(show_progress)
        .run(input, output)
        .await
}

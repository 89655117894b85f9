use super::monitor;
use super::ui::{self, StyleType};
use crate::core::{AppConfig, RateProvider, RateQuery, RateSnapshot};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

/// Amount used when the user skips the prompt or types something unparsable.
const FALLBACK_AMOUNT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountInput {
    Blank,
    Valid(f64),
    Invalid,
}

/// Classifies the answer to the amount prompt. Non-finite values are invalid.
pub fn parse_amount(input: &str) -> AmountInput {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return AmountInput::Blank;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => AmountInput::Valid(value),
        _ => AmountInput::Invalid,
    }
}

/// Normalizes the answer to the base currency prompt. Returns `None` unless
/// the result is exactly three characters.
pub fn parse_base_currency(input: &str, default: &str) -> Option<String> {
    let code = input.trim().to_uppercase();
    let code = if code.is_empty() {
        default.to_string()
    } else {
        code
    };
    (code.chars().count() == 3).then_some(code)
}

/// The interactive preview-then-custom conversion flow.
pub struct Session<'a> {
    provider: &'a dyn RateProvider,
    config: &'a AppConfig,
    show_progress: bool,
}

impl<'a> Session<'a> {
    pub fn new(provider: &'a dyn RateProvider, config: &'a AppConfig) -> Self {
        Session {
            provider,
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn run<R, W>(&self, input: &mut R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let default_base = &self.config.default_currency;

        writeln!(out, "--- Welcome to Global Value Tracker ---")?;
        writeln!(out, "Loading live market preview (Base: {default_base})...")?;
        out.flush()?;
        if let Some(snapshot) = self.fetch(default_base, out).await? {
            self.render(&snapshot, self.config.preview_amount, out)?;
        }

        let answer = prompt(
            input,
            out,
            &format!("Enter your base currency (e.g., USD, EUR, GBP) [Skip for {default_base}]: "),
        )
        .await?;
        let Some(base) = parse_base_currency(&answer, default_base) else {
            info!(input = %answer, "Rejected base currency");
            writeln!(
                out,
                "{}",
                ui::style_text(
                    "Invalid format. Please use a 3-letter currency code.",
                    StyleType::Warning
                )
            )?;
            return Ok(());
        };

        let Some(snapshot) = self.fetch(&base, out).await? else {
            return Ok(());
        };

        let answer = prompt(input, out, &format!("Enter amount in {base} to convert: ")).await?;
        let amount = match parse_amount(&answer) {
            AmountInput::Blank => FALLBACK_AMOUNT,
            AmountInput::Valid(value) => value,
            AmountInput::Invalid => {
                writeln!(
                    out,
                    "{}",
                    ui::style_text(
                        "Invalid number. Showing conversion for 1.00 unit.",
                        StyleType::Warning
                    )
                )?;
                FALLBACK_AMOUNT
            }
        };

        self.render(&snapshot, amount, out)
    }

    /// Fetches one snapshot. Failures are reported to `out` and come back as `None`.
    async fn fetch<W: Write>(&self, base: &str, out: &mut W) -> Result<Option<RateSnapshot>> {
        let query = RateQuery::new(&self.config.api_key, base);
        let spinner = ui::new_spinner(
            &format!("Fetching {} rates...", query.base_currency()),
            self.show_progress,
        );
        let result = self.provider.fetch_rates(&query).await;
        spinner.finish_and_clear();

        match result {
            Ok(snapshot) if snapshot.is_empty() => {
                warn!(base = %query.base_currency(), "Provider returned no conversion rates");
                Ok(None)
            }
            Ok(snapshot) => {
                debug!(
                    base = %snapshot.base_currency,
                    updated = ?snapshot.last_updated_at(),
                    "Fetched rate snapshot"
                );
                Ok(Some(snapshot))
            }
            Err(e) => {
                warn!(error = %e, base = %query.base_currency(), "Rate fetch failed");
                writeln!(out, "{}", ui::style_text(&format!(" {e}"), StyleType::Error))?;
                Ok(None)
            }
        }
    }

    fn render<W: Write>(&self, snapshot: &RateSnapshot, amount: f64, out: &mut W) -> Result<()> {
        let lines = monitor::render_lines(snapshot, amount, &self.config.watchlist);
        monitor::write_lines(&lines, out).context("Failed to write conversion table")
    }
}

async fn prompt<R, W>(input: &mut R, out: &mut W, message: &str) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{message}")?;
    out.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .await
        .context("Failed to read user input")?;
    Ok(line.trim().to_string())
}

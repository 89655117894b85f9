//! Conversion table rendering.
//!
//! Builds the table as plain lines so the exact bytes can be checked without
//! touching stdout; [`write_lines`] does the printing.

use super::ui;
use crate::core::RateSnapshot;
use std::io::{self, Write};

const RULE_WIDTH: usize = 75;

/// One watchlist entry converted against a snapshot. `None` means the
/// provider had no usable rate for the ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRow {
    pub ticker: String,
    pub rate: Option<f64>,
    pub converted_value: Option<f64>,
}

impl ConversionRow {
    fn to_line(&self) -> String {
        match (self.rate, self.converted_value) {
            (Some(rate), Some(value)) => format!(
                "{:<10} | {:<15.4} | {} {}",
                self.ticker,
                rate,
                ui::format_grouped(value),
                self.ticker
            ),
            _ => format!("{:<10} | {:<15} | ---", self.ticker, "Not Found"),
        }
    }
}

/// Converts `amount` into every watchlist ticker, in watchlist order.
pub fn conversion_rows(
    snapshot: &RateSnapshot,
    amount: f64,
    watchlist: &[String],
) -> Vec<ConversionRow> {
    watchlist
        .iter()
        .map(|ticker| {
            if *ticker == snapshot.base_currency {
                return ConversionRow {
                    ticker: ticker.clone(),
                    rate: Some(1.0),
                    converted_value: Some(amount),
                };
            }
            let rate = snapshot.rate(ticker);
            ConversionRow {
                ticker: ticker.clone(),
                rate,
                converted_value: rate.map(|r| amount * r),
            }
        })
        .collect()
}

/// Renders the full table, one entry per output line.
pub fn render_lines(snapshot: &RateSnapshot, amount: f64, watchlist: &[String]) -> Vec<String> {
    let thick = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(RULE_WIDTH);

    let mut lines = vec![
        String::new(),
        thick.clone(),
        format!(
            " GLOBAL MONITOR | Amount: {} {}",
            ui::format_grouped(amount),
            snapshot.base_currency
        ),
        format!(" Last Updated: {}", snapshot.last_updated_short()),
        thick.clone(),
        format!("{:<10} | {:<15} | {}", "Ticker", "Current Rate", "Converted Value"),
        thin,
    ];

    lines.extend(
        conversion_rows(snapshot, amount, watchlist)
            .iter()
            .map(ConversionRow::to_line),
    );

    lines.push(thick);
    lines.push(String::new());
    lines
}

pub fn write_lines<W: Write>(lines: &[String], out: &mut W) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

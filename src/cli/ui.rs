use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Error,
    Warning,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Error => style(text).red(),
        StyleType::Warning => style(text).yellow(),
    };
    styled.to_string()
}

/// Formats a number with two decimals and comma thousands separators,
/// e.g. `1234567.891` as `1,234,567.89`.
pub fn format_grouped(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    // Non-numeric renderings such as "inf" have nothing to group.
    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return formatted;
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Creates a spinner shown on stderr while a request is in flight.
pub fn new_spinner(message: &str, visible: bool) -> ProgressBar {
    let pb = if visible {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
    };
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0.00");
        assert_eq!(format_grouped(1.0), "1.00");
        assert_eq!(format_grouped(999.999), "1,000.00");
        assert_eq!(format_grouped(1000.0), "1,000.00");
        assert_eq!(format_grouped(10000.0), "10,000.00");
        assert_eq!(format_grouped(150000.0), "150,000.00");
        assert_eq!(format_grouped(1234567.891), "1,234,567.89");
    }

    #[test]
    fn test_format_grouped_negative() {
        assert_eq!(format_grouped(-1234.5), "-1,234.50");
        assert_eq!(format_grouped(-12.0), "-12.00");
    }

    #[test]
    fn test_format_grouped_non_finite() {
        assert_eq!(format_grouped(f64::INFINITY), "inf");
    }

    #[test]
    fn test_style_text_keeps_content() {
        let styled = style_text("Network error", StyleType::Error);
        assert!(styled.contains("Network error"));
    }

    #[test]
    fn test_hidden_spinner() {
        let pb = new_spinner("Fetching rates...", false);
        assert!(pb.is_hidden());
        pb.finish_and_clear();
    }
}

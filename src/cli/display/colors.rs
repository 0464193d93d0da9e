//! Status, probability and severity color mapping for CLI output.
//!
//! `console` drops styling automatically when stdout is not a terminal.

use console::{style, StyledObject};

/// Returns a colored string for a simulation status.
///
/// Completed = green bold, Fallback = yellow, anything else plain.
pub fn colorize_status(status: &str) -> StyledObject<&str> {
    match status.to_lowercase().as_str() {
        "completed" => style(status).green().bold(),
        "fallback" => style(status).yellow(),
        "cancelled" | "failed" => style(status).red().bold(),
        _ => style(status),
    }
}

/// Render a unit-interval probability as a colored percentage.
pub fn colorize_probability(probability: f64) -> StyledObject<String> {
    let text = format!("{:.0}%", probability * 100.0);
    if probability > 0.7 {
        style(text).green().bold()
    } else if probability > 0.4 {
        style(text).yellow()
    } else {
        style(text).red()
    }
}

/// Returns a colored string for objection severity and complexity levels.
pub fn colorize_risk(level: &str) -> StyledObject<&str> {
    match level.to_lowercase().as_str() {
        "high" => style(level).red().bold(),
        "medium" => style(level).yellow(),
        "low" => style(level).green(),
        _ => style(level),
    }
}

/// Returns a colored string for conversation quality.
pub fn colorize_quality(quality: &str) -> StyledObject<&str> {
    match quality.to_lowercase().as_str() {
        "excellent" => style(quality).green().bold(),
        "good" => style(quality).green(),
        "fair" => style(quality).yellow(),
        "poor" => style(quality).red(),
        _ => style(quality),
    }
}

/// Style a field label (dimmed).
pub fn label(text: &str) -> StyledObject<&str> {
    style(text).dim()
}

//! Command-line interface for prospector.

pub mod commands;
pub mod display;
pub mod output;
pub mod types;

pub use types::{Cli, Commands, LeadArgs};

use crate::domain::errors::DomainError;

/// Process exit code for a run stopped by the user.
pub const EXIT_CANCELLED: i32 = 130;

/// Print `err` in the selected format and exit with a failure code.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let cancelled = matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::Cancelled)
    );

    if json_mode {
        let chain: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": chain,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("{} {err:#}", console::style("Error:").red().bold());
    }

    std::process::exit(if cancelled { EXIT_CANCELLED } else { 1 });
}

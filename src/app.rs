//! Command execution
//!
//! Runs one CLI command against a session and returns what should be printed
//! on stdout. Generic over the transport and the prompt streams so whole
//! command flows can be exercised without a network or a terminal.

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::io::{BufRead, Write};
use std::time::Duration;
use tmstat_client::{AccountSession, Transport};
use tmstat_core::error::Result;
use tmstat_terminal::OutputFormatter;
use tracing::info;

use crate::cli::Command;
use crate::credentials::{Prompter, ensure_authenticated, log_in};

/// Output and presentation settings for a run
pub struct RunOptions<'a> {
    pub formatter: &'a dyn OutputFormatter,
    pub json: bool,
    /// Show a spinner while waiting on the API
    pub show_progress: bool,
}

/// Execute `command` and return the text for stdout
pub async fn execute<T: Transport, R: BufRead, W: Write>(
    command: Command,
    session: &mut AccountSession<T>,
    prompter: &mut Prompter<R, W>,
    options: &RunOptions<'_>,
) -> Result<String> {
    match command {
        Command::Usage => {
            info!("Running usage report");
            ensure_authenticated(session, prompter).await?;

            let spinner = spinner(options.show_progress, "Fetching balance...");
            let snapshot = session.fetch_usage_snapshot().await;
            spinner.finish_and_clear();

            Ok(options.formatter.format_usage(&snapshot?, Utc::now()))
        }

        Command::Login => {
            info!("Running PIN login");
            let token = log_in(session, prompter).await?;
            if options.json {
                Ok(format!(
                    "{:#}",
                    json!({
                        "subscriber_number": session.subscriber_number(),
                        "token": token,
                    })
                ))
            } else {
                Ok(token)
            }
        }

        Command::Invoices => {
            info!("Running invoice report");
            ensure_authenticated(session, prompter).await?;

            let spinner = spinner(options.show_progress, "Fetching invoices...");
            let invoices = session.fetch_invoices().await;
            spinner.finish_and_clear();

            Ok(options.formatter.format_invoices(&invoices?.body))
        }

        Command::Logout => {
            info!("Ending session");
            let envelope = session.end_session().await?;
            if options.json {
                Ok(format!("{:#}", json!(envelope)))
            } else {
                Ok("Logged out".to_string())
            }
        }
    }
}

fn spinner(enabled: bool, message: &'static str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

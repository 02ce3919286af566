//! tmstat - Check Tesco Mobile allowances and invoices from the terminal

use clap::Parser;
use is_terminal::IsTerminal;
use std::process::ExitCode;
use tmstat::{
    AccountSession, SessionConfig,
    app::{RunOptions, execute},
    cli::Cli,
    credentials::{Prompter, resolve_phone_number},
};
use tmstat_core::error::Result;
use tmstat_terminal::get_formatter;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;

    let timezone = cli.timezone_config()?;
    info!("Using timezone: {}", timezone.display_name());

    let mut prompter = Prompter::stdio();
    let phone_number = resolve_phone_number(cli.phone_number.clone(), &mut prompter)?;
    let config = SessionConfig::new(phone_number)?
        .with_token(cli.token.clone())
        .with_user_agent(cli.user_agent.clone())
        .with_base_url(cli.base_url.clone())?;
    let mut session = AccountSession::new(config)?;

    let interactive = std::io::stdout().is_terminal();
    let formatter = get_formatter(
        cli.json,
        cli.report_width(),
        timezone,
        interactive && std::env::var("NO_COLOR").is_err(),
    );
    let options = RunOptions {
        formatter: formatter.as_ref(),
        json: cli.json,
        show_progress: interactive && !cli.json,
    };

    let output = execute(cli.command(), &mut session, &mut prompter, &options).await?;
    println!("{output}");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose; logs go to stderr to keep stdout clean
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

//! CLI interface for tmstat
//!
//! Phone number and token can come from flags or from the environment
//! (`TESCO_PHONENUMBER`, `TESCO_TOKEN`). Whatever is still missing is asked
//! for interactively, see [`crate::credentials`].
//!
//! # Example
//!
//! ```bash
//! # Usage report, logging in by SMS PIN if no token is known
//! TESCO_PHONENUMBER=07700900123 tmstat
//!
//! # Invoice history as JSON
//! tmstat --json invoices
//!
//! # Invalidate the stored token
//! tmstat logout
//! ```

use clap::{Parser, Subcommand};
use tmstat_core::config::{DEFAULT_BASE_URL, PHONE_NUMBER_ENV, TOKEN_ENV};
use tmstat_core::error::{Result, TmstatError};
use tmstat_core::timezone::TimezoneConfig;

/// Check Tesco Mobile allowances and invoices
#[derive(Parser, Debug, Clone)]
#[command(name = "tmstat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Phone number in national format (07...)
    #[arg(long, short = 'n', env = PHONE_NUMBER_ENV, global = true)]
    pub phone_number: Option<String>,

    /// Bearer token from a previous login
    #[arg(long, env = TOKEN_ENV, hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Override the User-Agent sent to the API
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// API root
    #[arg(long, env = "TMSTAT_BASE_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,

    /// Timezone for bill dates (e.g. "Europe/London", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC for bill dates (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Report width in columns (defaults to the terminal width)
    #[arg(long, short = 'w', global = true, value_parser = clap::value_parser!(u16).range(42..))]
    pub width: Option<u16>,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands; `usage` runs when none is given
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Show allowances for the current bill cycle
    Usage,
    /// Log in with an SMS PIN and print the token
    Login,
    /// List invoices
    Invoices,
    /// Invalidate the token
    Logout,
}

impl Cli {
    /// The command to run
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Usage)
    }

    /// Timezone for bill dates
    pub fn timezone_config(&self) -> Result<TimezoneConfig> {
        TimezoneConfig::from_cli(self.timezone.as_deref(), self.utc)
    }

    /// Report width: the flag, else the terminal, else 80
    pub fn report_width(&self) -> usize {
        self.width
            .map(usize::from)
            .or_else(tmstat_terminal::terminal_width)
            .unwrap_or(tmstat_terminal::DEFAULT_WIDTH)
    }

    /// Tracing filter directive for the selected verbosity
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "tmstat=info,tmstat_client=info,tmstat_core=info,tmstat_terminal=info"
        } else {
            "warn"
        }
    }

    /// Reject flag combinations that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.command() == Command::Logout && self.token.as_deref().is_none_or(str::is_empty) {
            return Err(TmstatError::InvalidArgument(format!(
                "logout needs a token (--token or {TOKEN_ENV})"
            )));
        }
        Ok(())
    }
}

//! tmstat - Check Tesco Mobile allowances and invoices from the terminal
//!
//! This crate wires the workspace together into a CLI:
//! - [`cli`] parses flags and environment variables
//! - [`credentials`] fills in a missing phone number or token interactively
//! - [`app`] runs a command against an account session
//!
//! The session lives in `tmstat-client` and the report renderer in
//! `tmstat-terminal`; both are re-exported here.
//!
//! # Examples
//!
//! ```no_run
//! use tmstat::{AccountSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() -> tmstat::Result<()> {
//!     let config = SessionConfig::new("07700900123")?
//!         .with_token(std::env::var("TESCO_TOKEN").ok());
//!     let session = AccountSession::new(config)?;
//!
//!     let snapshot = session.fetch_usage_snapshot().await?;
//!     println!("{}", snapshot.tariff_description);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;
pub mod credentials;

// Re-export commonly used types
pub use tmstat_client::AccountSession;
pub use tmstat_core::{Result, SessionConfig, TmstatError, UsageSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

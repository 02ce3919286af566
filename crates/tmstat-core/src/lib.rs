//! Core types, errors, and configuration for tmstat
//!
//! This crate holds what the session and the terminal renderer share:
//! the error type, the API wire types and the usage snapshot derived from
//! them, session configuration, and timezone handling for report dates.

pub mod config;
pub mod error;
pub mod timezone;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use config::SessionConfig;
pub use error::{Result, TmstatError};
pub use timezone::TimezoneConfig;
pub use types::{
    AllowanceQuota, AllowanceType, Envelope, InvoiceList, PinConfirmation, SubscriberNumber,
    UsageResponse, UsageSnapshot,
};

//! Account session and HTTP transport for the Tesco Mobile usage API
//!
//! This crate implements the PIN login flow and the authenticated calls
//! (usage, invoices, logout) on top of a pluggable [`Transport`].

pub mod headers;
pub mod response;
pub mod session;
pub mod transport;

pub use response::{decode_envelope, ensure_ok};
pub use session::AccountSession;
pub use transport::{ApiRequest, HttpMethod, HttpTransport, Transport};

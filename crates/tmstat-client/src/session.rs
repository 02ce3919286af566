//! Account session for the carrier API
//!
//! An [`AccountSession`] holds a subscriber number and, once a PIN has been
//! redeemed, a bearer token. The login sequence is:
//!
//! 1. [`AccountSession::request_pin`] makes the carrier text a PIN
//! 2. [`AccountSession::redeem_pin`] trades the PIN for a token
//! 3. authenticated calls ([`fetch_usage`](AccountSession::fetch_usage),
//!    [`fetch_invoices`](AccountSession::fetch_invoices),
//!    [`end_session`](AccountSession::end_session)) use the token
//!
//! Calls are made one at a time and never retried.
//!
//! # Example
//!
//! ```no_run
//! use tmstat_client::AccountSession;
//! use tmstat_core::SessionConfig;
//!
//! # async fn run() -> tmstat_core::Result<()> {
//! let config = SessionConfig::new("07700900123")?;
//! let mut session = AccountSession::new(config)?;
//! session.request_pin().await?;
//! session.redeem_pin("1234").await?;
//! let usage = session.fetch_usage_snapshot().await?;
//! println!("{} allowances", usage.allowances.len());
//! # Ok(())
//! # }
//! ```

use chrono::Utc;
use serde_json::{Value, json};
use std::fmt;
use tmstat_core::config::SessionConfig;
use tmstat_core::error::{Result, TmstatError};
use tmstat_core::types::{
    Envelope, ExtraFields, InvoiceList, PinConfirmation, SubscriberNumber, UsageResponse,
    UsageSnapshot,
};
use tracing::{debug, info, warn};

use crate::headers;
use crate::response::decode_envelope;
use crate::transport::{ApiRequest, HttpMethod, HttpTransport, Transport};

pub const REQUEST_PIN_PATH: &str = "/requestpin";
pub const CONFIRM_PIN_PATH: &str = "/confirmpin";
pub const USAGE_PATH: &str = "/full";
pub const INVOICE_PATH: &str = "/invoice";
pub const LOGOUT_PATH: &str = "/logout";

/// A subscriber's session with the carrier API
pub struct AccountSession<T = HttpTransport> {
    subscriber_number: SubscriberNumber,
    token: Option<String>,
    user_agent: String,
    transport: T,
}

impl AccountSession<HttpTransport> {
    /// Create a session talking to the configured API over HTTPS
    pub fn new(config: SessionConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.base_url.clone())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> AccountSession<T> {
    /// Create a session on top of any transport
    pub fn with_transport(config: SessionConfig, transport: T) -> Self {
        Self {
            subscriber_number: config.subscriber_number,
            token: config.token,
            user_agent: config.user_agent,
            transport,
        }
    }

    pub fn subscriber_number(&self) -> &SubscriberNumber {
        &self.subscriber_number
    }

    /// Current bearer token, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ask the carrier to text a login PIN to the subscriber
    pub async fn request_pin(&self) -> Result<Envelope<ExtraFields>> {
        info!("Requesting PIN for {}", self.subscriber_number);
        let body = json!({ "subscriberNumber": self.subscriber_number.as_str() });
        let request = self.post(REQUEST_PIN_PATH, body)?;
        decode_envelope(self.transport.execute(request).await?)
    }

    /// Exchange a PIN for a bearer token and keep it in the session
    pub async fn redeem_pin(&mut self, pin: &str) -> Result<Envelope<PinConfirmation>> {
        info!("Redeeming PIN for {}", self.subscriber_number);
        let body = json!({
            "pinCode": pin.trim(),
            "subscriptionNumber": self.subscriber_number.as_str(),
        });
        let request = self.post(CONFIRM_PIN_PATH, body)?;
        let envelope: Envelope<PinConfirmation> =
            decode_envelope(self.transport.execute(request).await?)?;

        let token = envelope
            .body
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TmstatError::MalformedResponse("PIN accepted but no token returned".into()))?;
        self.token = Some(token);
        debug!("Stored bearer token");

        Ok(envelope)
    }

    /// Fetch the raw usage envelope
    pub async fn fetch_usage(&self) -> Result<Envelope<UsageResponse>> {
        let token = self.require_token()?;
        let now = Utc::now();

        let mut request = self.post(
            USAGE_PATH,
            json!({ "subscriptionNumber": self.subscriber_number.as_str() }),
        )?;
        headers::add_token(&mut request.headers, token)?;
        headers::add_usage_headers(&mut request.headers, &headers::correlation_id(), now)?;

        info!("Fetching usage for {}", self.subscriber_number);
        decode_envelope(self.transport.execute(request).await?)
    }

    /// Fetch usage and convert it to a snapshot
    pub async fn fetch_usage_snapshot(&self) -> Result<UsageSnapshot> {
        Ok(UsageSnapshot::from(self.fetch_usage().await?.body))
    }

    /// Fetch the account's invoice history
    pub async fn fetch_invoices(&self) -> Result<Envelope<InvoiceList>> {
        let token = self.require_token()?;
        let path = format!("{INVOICE_PATH}/{}", self.subscriber_number);
        let mut request = self.get(path)?;
        headers::add_token(&mut request.headers, token)?;

        info!("Fetching invoices for {}", self.subscriber_number);
        decode_envelope(self.transport.execute(request).await?)
    }

    /// Invalidate the token server-side
    ///
    /// The local token is dropped whatever the server answers.
    pub async fn end_session(&mut self) -> Result<Envelope<ExtraFields>> {
        let token = self
            .token
            .take()
            .ok_or(TmstatError::AuthenticationRequired)?;

        let mut request = self.get(LOGOUT_PATH.to_string())?;
        headers::add_token(&mut request.headers, &token)?;

        info!("Ending session for {}", self.subscriber_number);
        let result = self
            .transport
            .execute(request)
            .await
            .and_then(decode_envelope);
        if let Err(e) = &result {
            warn!("Logout did not complete cleanly: {}", e);
        }
        result
    }

    fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or(TmstatError::AuthenticationRequired)
    }

    fn post(&self, path: &str, body: Value) -> Result<ApiRequest> {
        let mut headers = headers::base_headers(&self.user_agent, Utc::now())?;
        headers::add_json_body(&mut headers);
        Ok(ApiRequest {
            method: HttpMethod::Post,
            path: path.to_string(),
            headers,
            body: Some(body),
        })
    }

    fn get(&self, path: String) -> Result<ApiRequest> {
        Ok(ApiRequest {
            method: HttpMethod::Get,
            path,
            headers: headers::base_headers(&self.user_agent, Utc::now())?,
            body: None,
        })
    }
}

impl<T> fmt::Debug for AccountSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSession")
            .field("subscriber_number", &self.subscriber_number)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

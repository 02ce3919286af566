//! Common test utilities and helpers for tmstat tests
//!
//! Provides a scripted transport standing in for the carrier API and
//! builders for the JSON replies it sends.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Mutex;
use tmstat::credentials::Prompter;
use tmstat::{AccountSession, SessionConfig};
use tmstat_client::{ApiRequest, Transport};
use tmstat_core::error::{Result, TmstatError};

pub const TEST_NUMBER: &str = "07700900123";

/// Transport that answers from a script and records every request
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Value>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply
    pub fn reply(self, value: Value) -> Self {
        self.replies.lock().unwrap().push_back(Ok(value));
        self
    }

    /// Queue a transport failure
    pub fn fail(self, message: &str) -> Self {
        let err = TmstatError::Io(std::io::Error::other(message.to_string()));
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: no scripted reply left")
    }
}

/// Session for the test number, optionally already holding a token
pub fn session(transport: MockTransport, token: Option<&str>) -> AccountSession<MockTransport> {
    let config = SessionConfig::new(TEST_NUMBER)
        .unwrap()
        .with_token(token.map(str::to_string));
    AccountSession::with_transport(config, transport)
}

/// Prompter fed with `input`, capturing what it prints
pub fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
    Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

pub fn ok() -> Value {
    json!({ "responseCode": "OK" })
}

pub fn server_error(code: &str) -> Value {
    json!({ "responseCode": code })
}

pub fn pin_confirmation(token: &str) -> Value {
    json!({ "responseCode": "OK", "token": token })
}

/// Builder for `/full` replies
pub struct UsageReplyBuilder {
    phone_number: String,
    tariff: String,
    bill_produced_ms: i64,
    next_bill_ms: i64,
    allowances: Vec<Value>,
}

impl UsageReplyBuilder {
    /// Bill cycle 2024-01-01 to 2024-02-01 UTC, no allowances
    pub fn new() -> Self {
        Self {
            phone_number: TEST_NUMBER.to_string(),
            tariff: "12 Month SIM Only".to_string(),
            bill_produced_ms: 1_704_067_200_000,
            next_bill_ms: 1_706_745_600_000,
            allowances: Vec::new(),
        }
    }

    pub fn with_tariff(mut self, tariff: &str) -> Self {
        self.tariff = tariff.to_string();
        self
    }

    pub fn with_cycle(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.bill_produced_ms = start_ms;
        self.next_bill_ms = end_ms;
        self
    }

    pub fn with_allowance(mut self, code: &str, total: f64, remaining: f64) -> Self {
        self.allowances.push(json!({
            "allowanceType": code,
            "totalAllowance": total,
            "totalRemaining": remaining,
        }));
        self
    }

    pub fn build(self) -> Value {
        json!({
            "responseCode": "OK",
            "subscriberInformation": {
                "mobilePhoneNumber": self.phone_number,
                "tariff": { "description": self.tariff }
            },
            // dates may arrive as strings
            "lastInvoice": { "billProducedDate": self.bill_produced_ms.to_string() },
            "nextBillDate": self.next_bill_ms.to_string(),
            "allowances": self.allowances,
        })
    }
}

impl Default for UsageReplyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Core domain types for tmstat
//!
//! This module contains the wire shapes returned by the carrier API and the
//! domain types derived from them. Wire types mirror the camelCase JSON the
//! API speaks; anything the API sends that we do not model is kept in a
//! flattened map so nothing is silently dropped.

use crate::error::{Result, TmstatError};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Value of `responseCode` on a successful call
pub const RESPONSE_OK: &str = "OK";

/// Unmodelled JSON fields of a response
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;

/// Strongly-typed subscriber (phone) number
///
/// The carrier only accepts national format, so a number is rejected when
/// empty or when it starts with `+`.
///
/// # Examples
/// ```
/// use tmstat_core::types::SubscriberNumber;
///
/// let number = SubscriberNumber::parse("07700900123").unwrap();
/// assert_eq!(number.as_str(), "07700900123");
///
/// assert!(SubscriberNumber::parse("+447700900123").is_err());
/// assert!(SubscriberNumber::parse("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriberNumber(String);

impl SubscriberNumber {
    /// Validate and wrap a phone number
    pub fn parse(number: impl Into<String>) -> Result<Self> {
        let number = number.into();
        if number.is_empty() {
            return Err(TmstatError::InvalidSubscriberNumber(
                "phone number must be provided".to_string(),
            ));
        }
        if number.starts_with('+') {
            return Err(TmstatError::InvalidSubscriberNumber(format!(
                "'{number}' must start with 07..., not +447..."
            )));
        }
        Ok(Self(number))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SubscriberNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A response envelope: the `responseCode` plus a typed body
///
/// The body is flattened, so `T` sees the same top-level object minus the
/// response code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Status reported by the server, `OK` on success
    #[serde(rename = "responseCode", default)]
    pub response_code: Option<String>,
    /// Remaining fields of the response
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    /// Whether the server reported success
    pub fn is_ok(&self) -> bool {
        self.response_code.as_deref() == Some(RESPONSE_OK)
    }
}

/// Body of `/confirmpin`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinConfirmation {
    /// Bearer token for authenticated calls
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Body of `/invoice/{number}`
///
/// The invoice shape is not documented, so the whole body is kept as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceList {
    #[serde(flatten)]
    pub fields: ExtraFields,
}

impl InvoiceList {
    /// Rows of the first field holding an array of objects, if any
    pub fn entries(&self) -> Option<Vec<&ExtraFields>> {
        self.fields.values().find_map(|value| {
            let items = value.as_array()?;
            let rows: Vec<&ExtraFields> = items.iter().filter_map(|v| v.as_object()).collect();
            (!rows.is_empty() && rows.len() == items.len()).then_some(rows)
        })
    }
}

/// Body of `/full`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    pub subscriber_information: SubscriberInformation,
    pub last_invoice: LastInvoice,
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    #[serde(serialize_with = "epoch_millis::serialize")]
    pub next_bill_date: DateTime<Utc>,
    #[serde(default)]
    pub allowances: Vec<AllowanceRecord>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Subscriber section of the usage response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberInformation {
    pub mobile_phone_number: String,
    pub tariff: Tariff,
}

/// Tariff description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub description: String,
}

/// Last invoice section; its production date opens the current bill cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastInvoice {
    #[serde(deserialize_with = "epoch_millis::deserialize")]
    #[serde(serialize_with = "epoch_millis::serialize")]
    pub bill_produced_date: DateTime<Utc>,
}

/// One allowance as sent by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceRecord {
    pub allowance_type: String,
    pub total_allowance: f64,
    pub total_remaining: f64,
}

/// Usage category of an allowance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceType {
    Minutes,
    Texts,
    Data,
    SafetyBuffer,
    Other(String),
}

impl AllowanceType {
    /// Map an API allowance code to its category
    pub fn from_code(code: &str) -> Self {
        match code {
            "MIN" => Self::Minutes,
            "UNIT" => Self::Texts,
            "MB" => Self::Data,
            "SAFETYBUFFER" => Self::SafetyBuffer,
            other => Self::Other(other.to_string()),
        }
    }

    /// Human-readable name, `None` for categories that are not displayed
    pub fn display_name(&self) -> Option<&'static str> {
        match self {
            Self::Minutes => Some("Minutes"),
            Self::Texts => Some("Texts"),
            Self::Data => Some("Data"),
            Self::SafetyBuffer => Some("Safety buffer"),
            Self::Other(_) => None,
        }
    }
}

/// Total and remaining quantity of one allowance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceQuota {
    pub allowance_type: AllowanceType,
    pub total: f64,
    pub remaining: f64,
}

impl AllowanceQuota {
    /// Quantity consumed so far
    pub fn used(&self) -> f64 {
        self.total - self.remaining
    }
}

impl From<&AllowanceRecord> for AllowanceQuota {
    fn from(record: &AllowanceRecord) -> Self {
        Self {
            allowance_type: AllowanceType::from_code(&record.allowance_type),
            total: record.total_allowance,
            remaining: record.total_remaining,
        }
    }
}

/// Account usage at a point in time, in domain terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub subscriber_number: String,
    pub tariff_description: String,
    pub bill_cycle_start: DateTime<Utc>,
    pub bill_cycle_end: DateTime<Utc>,
    pub allowances: Vec<AllowanceQuota>,
}

impl From<UsageResponse> for UsageSnapshot {
    fn from(response: UsageResponse) -> Self {
        Self {
            allowances: response.allowances.iter().map(AllowanceQuota::from).collect(),
            subscriber_number: response.subscriber_information.mobile_phone_number,
            tariff_description: response.subscriber_information.tariff.description,
            bill_cycle_start: response.last_invoice.bill_produced_date,
            bill_cycle_end: response.next_bill_date,
        }
    }
}

/// Epoch-millisecond timestamps, sent either as numbers or as strings
pub mod epoch_millis {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Millis {
        Number(i64),
        Float(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = match Millis::deserialize(deserializer)? {
            Millis::Number(n) => n,
            Millis::Float(f) => f as i64,
            Millis::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                serde::de::Error::custom(format!("invalid epoch milliseconds: '{s}'"))
            })?,
        };
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {millis}")))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(value.timestamp_millis())
    }
}

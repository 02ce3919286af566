//! Request header construction
//!
//! The API checks for an Android client identification on every call and
//! expects a handful of app-specific headers on the usage call.

use chrono::{DateTime, Utc};
use reqwest::header::{
    ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, IF_MODIFIED_SINCE, USER_AGENT,
};
use tmstat_core::config::CLIENT_IDENTIFICATION;
use tmstat_core::error::{Result, TmstatError};
use uuid::Uuid;

pub const X_CLIENT: HeaderName = HeaderName::from_static("x-client");
pub const X_TOKEN: HeaderName = HeaderName::from_static("x-token");
pub const REQUEST_ID: HeaderName = HeaderName::from_static("reqid");
pub const TIMESTAMP: HeaderName = HeaderName::from_static("ts");
pub const CNT: HeaderName = HeaderName::from_static("cnt");
pub const NET: HeaderName = HeaderName::from_static("net");

const IF_MODIFIED_SINCE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT+00:00";

/// `If-Modified-Since` value for `now`
///
/// Always the current time, so the server never answers 304.
pub fn if_modified_since(now: DateTime<Utc>) -> String {
    now.format(IF_MODIFIED_SINCE_FORMAT).to_string()
}

/// Random 32-character hex correlation id
pub fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        TmstatError::InvalidArgument(format!("{name} contains characters not allowed in a header"))
    })
}

/// Headers sent with every request
pub fn base_headers(user_agent: &str, now: DateTime<Utc>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value("user agent", user_agent)?);
    headers.insert(X_CLIENT, HeaderValue::from_static(CLIENT_IDENTIFICATION));
    headers.insert(IF_MODIFIED_SINCE, header_value("date", &if_modified_since(now))?);
    Ok(headers)
}

/// Mark the request as carrying a JSON body
pub fn add_json_body(headers: &mut HeaderMap) {
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
}

/// Attach the bearer token
pub fn add_token(headers: &mut HeaderMap, token: &str) -> Result<()> {
    let mut value = header_value("token", token)?;
    value.set_sensitive(true);
    headers.insert(X_TOKEN, value);
    Ok(())
}

/// Attach the app headers the usage endpoint expects
pub fn add_usage_headers(headers: &mut HeaderMap, request_id: &str, now: DateTime<Utc>) -> Result<()> {
    headers.insert(CNT, HeaderValue::from_static("1"));
    headers.insert(NET, HeaderValue::from_static("WIFI"));
    headers.insert(REQUEST_ID, header_value("request id", request_id)?);
    headers.insert(TIMESTAMP, HeaderValue::from(now.timestamp_millis()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 5, 3).unwrap()
    }

    #[test]
    fn test_if_modified_since_format() {
        assert_eq!(
            if_modified_since(fixed_now()),
            "Mon, 15 Jan 2024 09:05:03 GMT+00:00"
        );
    }

    #[test]
    fn test_correlation_id_is_hex() {
        let id = correlation_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, correlation_id());
    }

    #[test]
    fn test_base_headers() {
        let headers = base_headers("test-agent/1.0", fixed_now()).unwrap();
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[USER_AGENT], "test-agent/1.0");
        assert_eq!(headers[X_CLIENT], "device=Android;version=3.5;tablet=false");
        assert_eq!(headers[IF_MODIFIED_SINCE], "Mon, 15 Jan 2024 09:05:03 GMT+00:00");
        assert!(!headers.contains_key(X_TOKEN));
        assert!(!headers.contains_key(CONTENT_TYPE));
    }

    #[test]
    fn test_usage_headers() {
        let mut headers = HeaderMap::new();
        add_usage_headers(&mut headers, "0123456789abcdef0123456789abcdef", fixed_now()).unwrap();
        assert_eq!(headers[CNT], "1");
        assert_eq!(headers[NET], "WIFI");
        assert_eq!(headers[REQUEST_ID], "0123456789abcdef0123456789abcdef");
        assert_eq!(headers[TIMESTAMP], "1705309503000");
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let mut headers = HeaderMap::new();
        assert!(add_token(&mut headers, "abc\ndef").is_err());
        add_token(&mut headers, "abc").unwrap();
        assert!(headers[X_TOKEN].is_sensitive());
    }
}

//! Session configuration
//!
//! `SessionConfig` carries everything an account session needs up front.
//! Where the values come from (flags, environment, prompts) is decided by the
//! caller; this module only validates and holds them.

use crate::error::{Result, TmstatError};
use crate::types::SubscriberNumber;

/// Base URL of the carrier API
pub const DEFAULT_BASE_URL: &str = "https://apitesco3.mobileaware.com/TescoAPI3";

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 6.0.1; Nexus 6P Build/MMB29P) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/47.0.2526.83 Mobile Safari/537.36";

/// Device identification expected by the API
pub const CLIENT_IDENTIFICATION: &str = "device=Android;version=3.5;tablet=false";

/// Environment variable holding the phone number
pub const PHONE_NUMBER_ENV: &str = "TESCO_PHONENUMBER";

/// Environment variable holding the bearer token
pub const TOKEN_ENV: &str = "TESCO_TOKEN";

/// Configuration for an account session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Validated subscriber number
    pub subscriber_number: SubscriberNumber,
    /// Bearer token from a previous PIN redemption
    pub token: Option<String>,
    /// User agent for every request
    pub user_agent: String,
    /// API root, without trailing slash
    pub base_url: String,
}

impl SessionConfig {
    /// Create a configuration for a phone number with default settings
    pub fn new(phone_number: impl Into<String>) -> Result<Self> {
        Ok(Self {
            subscriber_number: SubscriberNumber::parse(phone_number)?,
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Use an existing bearer token; blank tokens count as absent
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Override the user agent; blank values keep the default
    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        if let Some(ua) = user_agent.filter(|ua| !ua.trim().is_empty()) {
            self.user_agent = ua;
        }
        self
    }

    /// Point the session at another API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let trimmed = base_url.trim_end_matches('/');
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(TmstatError::Config(format!(
                "base URL must be http(s), got '{base_url}'"
            )));
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new("07700900123").unwrap();
        assert_eq!(config.subscriber_number.as_str(), "07700900123");
        assert!(config.token.is_none());
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(SessionConfig::new("").is_err());
        assert!(SessionConfig::new("+447700900123").is_err());
    }

    #[test]
    fn test_blank_overrides_are_ignored() {
        let config = SessionConfig::new("07700900123")
            .unwrap()
            .with_token(Some("  ".to_string()))
            .with_user_agent(Some(String::new()));
        assert!(config.token.is_none());
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_base_url_override() {
        let config = SessionConfig::new("07700900123")
            .unwrap()
            .with_base_url("http://127.0.0.1:8080/api/")
            .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/api");

        let result = SessionConfig::new("07700900123")
            .unwrap()
            .with_base_url("ftp://example.com");
        assert!(matches!(result, Err(TmstatError::Config(_))));
    }
}

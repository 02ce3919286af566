//! Response envelope validation
//!
//! Every reply carries a `responseCode`. Anything but `OK` is a failure, even
//! when the HTTP status was 200, so each call runs its reply through
//! [`decode_envelope`] before looking at the payload.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tmstat_core::error::{Result, TmstatError};
use tmstat_core::types::{Envelope, RESPONSE_OK};

/// Fail unless the reply's `responseCode` is `OK`
pub fn ensure_ok(response: &Value) -> Result<()> {
    let code = response.get("responseCode").and_then(Value::as_str);
    if code == Some(RESPONSE_OK) {
        Ok(())
    } else {
        Err(TmstatError::server_response(code))
    }
}

/// Validate the reply, then decode it into a typed envelope
pub fn decode_envelope<T: DeserializeOwned>(response: Value) -> Result<Envelope<T>> {
    ensure_ok(&response)?;
    Ok(serde_json::from_value(response)?)
}

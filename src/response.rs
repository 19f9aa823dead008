//! Response gate applied to every exchange, token and data calls alike.

use serde_json::Value;

use crate::error::{Result, RteError};
use crate::transport::HttpResponse;

/// Turn any non-200 response into [`RteError::Auth`].
///
/// The provider's `error_description` and `error` fields are used when the
/// body is JSON, with fixed fallbacks when they are missing or the body does
/// not parse at all.
pub fn check_response(response: &HttpResponse) -> Result<()> {
    if response.is_ok() {
        return Ok(());
    }

    let (description, error) = match serde_json::from_slice::<Value>(&response.body) {
        Ok(details) => (
            field_or(&details, "error_description", "Unknown error"),
            field_or(&details, "error", "Unknown error code"),
        ),
        Err(_) => (
            "Failed to parse error details".to_string(),
            "Unknown".to_string(),
        ),
    };

    tracing::debug!(status = response.status, %error, "request rejected");
    Err(RteError::Auth {
        status: response.status,
        description,
        error,
    })
}

fn field_or(details: &Value, key: &str, default: &str) -> String {
    match details.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

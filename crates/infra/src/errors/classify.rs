//! Classification of remote error bodies
//!
//! Remote failures arrive as loosely shaped bodies (bare strings, `{"error"}`
//! objects, `{"errors": [...]}` lists, or plain text). They are reduced to a
//! message and mapped onto a [`CaseSyncError`] kind here, once, so nothing
//! downstream inspects message text.

use casesync_domain::constants::INVALID_CREDENTIALS_MARKER;
use casesync_domain::CaseSyncError;
use reqwest::StatusCode;
use serde_json::Value;

const MESSAGE_KEYS: [&str; 3] = ["error", "message", "errorMessage"];

/// Extract the most specific human-readable message from a response body.
pub fn remote_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(map)) => {
            for key in MESSAGE_KEYS {
                match map.get(key) {
                    Some(Value::String(message)) if !message.is_empty() => return message.clone(),
                    Some(Value::Null) | None => {}
                    Some(other) => return other.to_string(),
                }
            }
            match map.get("errors") {
                Some(Value::Array(errors)) if !errors.is_empty() => join_messages(errors),
                _ => trimmed.to_string(),
            }
        }
        _ => trimmed.to_string(),
    }
}

/// Join a list of error entries (strings or objects carrying `message`).
pub fn join_messages(errors: &[Value]) -> String {
    errors
        .iter()
        .map(|entry| match entry {
            Value::String(message) => message.clone(),
            Value::Object(map) => match map.get("message") {
                Some(Value::String(message)) => message.clone(),
                _ => entry.to_string(),
            },
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Map a rejected credential exchange onto the authentication error kinds.
pub fn classify_auth_failure(status: StatusCode, body: &str) -> CaseSyncError {
    let message = remote_message(body);
    if message.contains(INVALID_CREDENTIALS_MARKER) {
        return CaseSyncError::InvalidCredentials(message);
    }
    if message == "empty response body" {
        return CaseSyncError::AuthenticationFailed(format!("HTTP {}", status.as_u16()));
    }
    CaseSyncError::AuthenticationFailed(message)
}

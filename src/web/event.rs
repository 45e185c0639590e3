//! Event-style entry point for serverless callers.
//!
//! Takes `{"post_code": ..., "house_number": ...}` and always returns an
//! [`EventResponse`]; failures become non-200 responses, never panics.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::council::BinDayError;
use crate::lookup::BinDayLookup;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinDayRequest {
    pub post_code: String,
    #[serde(deserialize_with = "string_or_number")]
    pub house_number: String,
}

/// House numbers arrive as `"26"` or `26` depending on the caller.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(n) => n.to_string(),
    })
}

/// Response envelope: status plus a JSON-encoded body string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl EventResponse {
    fn error(status_code: u16, kind: &str, message: impl std::fmt::Display) -> Self {
        Self {
            status_code,
            body: json!({ "error": kind, "message": message.to_string() }).to_string(),
        }
    }
}

/// HTTP status for each failure kind.
///
/// A missing address is the caller's problem (404); anything else means the
/// council site misbehaved (502).
pub fn status_for(err: &BinDayError) -> u16 {
    match err {
        BinDayError::AddressNotFound { .. } => 404,
        BinDayError::Transport { .. } | BinDayError::Protocol(_) | BinDayError::Parse(_) => 502,
    }
}

impl From<&BinDayError> for EventResponse {
    fn from(err: &BinDayError) -> Self {
        Self::error(status_for(err), err.kind(), err)
    }
}

/// Run one lookup for a raw event.
pub async fn handle_event(lookup: &BinDayLookup, event: Value) -> EventResponse {
    let request: BinDayRequest = match serde_json::from_value(event) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejecting malformed event");
            return EventResponse::error(400, "bad_request", e);
        }
    };

    match lookup
        .find_dates(&request.post_code, &request.house_number)
        .await
    {
        Ok(schedule) => match serde_json::to_string(&schedule) {
            Ok(body) => EventResponse {
                status_code: 200,
                body,
            },
            Err(e) => EventResponse::error(500, "internal", e),
        },
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "bin day lookup failed");
            EventResponse::from(&e)
        }
    }
}

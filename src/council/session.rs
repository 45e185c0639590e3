//! Session tokens threaded through the form flow.

use custom_debug_derive::Debug;

use crate::council::errors::BinDayError;

/// The four correlated identifiers that authenticate a form submission.
///
/// Values are never mutated in place. Each step that receives a fresh nonce
/// produces a new `SessionTokens` via [`with_nonce`](Self::with_nonce).
#[derive(Debug, Clone)]
pub struct SessionTokens {
    /// HTTP client owning this flow's cookie jar.
    #[debug(skip)]
    http: reqwest::Client,
    session_id: String,
    page_session_id: String,
    #[debug(with = "redact")]
    nonce: String,
}

fn redact(_: &String, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("<redacted>")
}

impl SessionTokens {
    /// Build a token set, rejecting any empty identifier.
    pub fn new(
        http: reqwest::Client,
        session_id: String,
        page_session_id: String,
        nonce: String,
    ) -> Result<Self, BinDayError> {
        for (name, value) in [
            ("session id", &session_id),
            ("page session id", &page_session_id),
            ("nonce", &nonce),
        ] {
            if value.trim().is_empty() {
                return Err(BinDayError::protocol(format!("empty {name}")));
            }
        }

        Ok(Self {
            http,
            session_id,
            page_session_id,
            nonce,
        })
    }

    /// Consume these tokens, returning a copy carrying the replacement nonce.
    pub fn with_nonce(self, nonce: String) -> Result<Self, BinDayError> {
        Self::new(self.http, self.session_id, self.page_session_id, nonce)
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn page_session_id(&self) -> &str {
        &self.page_session_id
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }
}

//! Error types for the council form client and bin day lookup.

/// Failure of a bin day lookup.
///
/// The variants separate "the caller asked for something that does not exist"
/// ([`AddressNotFound`](Self::AddressNotFound)) from "the site is unreachable or
/// has changed" ([`Transport`](Self::Transport), [`Protocol`](Self::Protocol)).
#[derive(Debug, thiserror::Error)]
pub enum BinDayError {
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("address not found: house {house_number} in {postcode}")]
    AddressNotFound {
        postcode: String,
        house_number: String,
    },
    #[error("could not parse collection date: {0}")]
    Parse(String),
}

impl BinDayError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Short machine-readable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Protocol(_) => "protocol",
            Self::AddressNotFound { .. } => "address_not_found",
            Self::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for BinDayError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        Self::Transport {
            message,
            source: Some(err),
        }
    }
}

//! Per-attempt outcome classification.
//!
//! Classification is independent of the timeout mode: it only says what went
//! wrong. Whether that failure is worth another attempt is decided in
//! [`crate::retry`].

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{error::error_message, JulesError};

/// Result of one HTTP attempt. `Ok(None)` is a successful response without a
/// body to decode.
pub(crate) type AttemptOutcome<T> = std::result::Result<Option<T>, AttemptFailure>;

#[derive(Debug, thiserror::Error)]
pub(crate) enum AttemptFailure {
    /// DNS, connect, TLS, body read or attempt timeout.
    #[error("request failed with {0}")]
    Transport(reqwest::Error),
    #[error("resource not found (404)")]
    NotFound { message: String },
    #[error("request failed with status {status}")]
    Status { status: u16, message: String },
    /// 2xx response with a body that does not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl AttemptFailure {
    pub(crate) fn into_error(self) -> JulesError {
        match self {
            Self::Transport(err) => JulesError::Transport(err),
            Self::NotFound { message } => JulesError::Http {
                status: StatusCode::NOT_FOUND.as_u16(),
                message,
            },
            Self::Status { status, message } => JulesError::Http { status, message },
            Self::Decode(message) => JulesError::Decode(message),
        }
    }
}

pub(crate) fn transport(err: reqwest::Error) -> AttemptFailure {
    AttemptFailure::Transport(err)
}

/// Classifies a completed response by status code.
pub(crate) fn status(status: StatusCode, body: &[u8]) -> Result<(), AttemptFailure> {
    if status.is_success() {
        return Ok(());
    }

    let message = error_message(body);
    if status == StatusCode::NOT_FOUND {
        return Err(AttemptFailure::NotFound { message });
    }
    Err(AttemptFailure::Status {
        status: status.as_u16(),
        message,
    })
}

/// Decodes a successful body. Empty bodies are a valid "no result".
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> AttemptOutcome<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<T>(body).map(Some).map_err(|err| {
        AttemptFailure::Decode(format!(
            "{err}; body: {}",
            String::from_utf8_lossy(body)
        ))
    })
}

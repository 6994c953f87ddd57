use serde::Deserialize;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum JulesError {
    /// No API key was configured explicitly or through `JULES_API_KEY`.
    #[error("API key must be provided or set as JULES_API_KEY environment variable")]
    MissingApiKey,
    /// Network or request execution error from `reqwest`, including
    /// per-attempt timeouts.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Non-success HTTP status code.
    ///
    /// `message` is the `error.message` field of the response body when the
    /// service returned a structured error, otherwise the raw body text.
    #[error("http error {status}: {message}")]
    Http { status: u16, message: String },
    /// A successful response whose body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The request body could not be serialized to JSON.
    #[error("encode error: {0}")]
    Encode(String),
    /// The caller's cancellation token fired before the call completed.
    #[error("request cancelled")]
    Cancelled,
}

impl JulesError {
    /// Returns the HTTP status for [`JulesError::Http`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the service answered `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    status: Option<String>,
}

/// Extracts a human-readable message from a non-2xx response body.
///
/// Prefers `error.message` from a structured envelope and falls back to the
/// raw body text when the body is not one or the message is empty.
pub(crate) fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.trim().is_empty() => envelope.error.message,
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}

use std::fmt;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum DeepLError {
    /// No auth key is available in the credential store.
    #[error("missing auth key, store one before calling DeepL")]
    MissingCredential,
    /// Caller-supplied argument was rejected before any network activity.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Translations are disabled and the cell has no value to keep.
    #[error("translations are disabled and no current value is available")]
    TranslationsDisabled,
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Every attempt ended in a retryable failure.
    #[error("max retries reached after {attempts} attempts, last failure: {last}")]
    MaxRetriesReached {
        attempts: usize,
        /// Reason the final attempt was considered retryable.
        last: String,
    },
    /// HTTP 403: the auth key is invalid or revoked.
    #[error("authorization failure, check auth key{0}")]
    AuthorizationFailure(ErrorDetails),
    /// HTTP 456: character quota for the billing period is used up.
    #[error("quota for this billing period has been exceeded{0}")]
    QuotaExceeded(ErrorDetails),
    /// HTTP 400: request parameters were rejected.
    #[error("bad request{0}")]
    BadRequest(ErrorDetails),
    /// HTTP 429 surfaced to the caller.
    #[error("too many requests, DeepL servers are currently experiencing high load{0}")]
    RateLimited(ErrorDetails),
    /// Any other non-success HTTP status.
    #[error("unexpected status code {status}{details}")]
    UnexpectedStatus { status: u16, details: ErrorDetails },
    /// Success response did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl DeepLError {
    /// HTTP status behind this error, when it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthorizationFailure(_) => Some(403),
            Self::QuotaExceeded(_) => Some(456),
            Self::BadRequest(_) => Some(400),
            Self::RateLimited(_) => Some(429),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extra context extracted from an error response body.
///
/// Renders as a suffix such as `, message: Invalid target, detail: ...`, or
/// `, body: <raw text>` when the body was not JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorDetails {
    pub message: Option<String>,
    pub detail: Option<String>,
    /// Raw response body, kept when it could not be parsed as JSON.
    pub raw_body: Option<String>,
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            write!(f, ", message: {message}")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ", detail: {detail}")?;
        }
        if let Some(body) = &self.raw_body {
            write!(f, ", body: {body}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DeepLError, ErrorDetails};

    #[test]
    fn details_render_as_message_suffix() {
        let err = DeepLError::BadRequest(ErrorDetails {
            message: Some("Value for 'target_lang' not supported.".to_owned()),
            detail: Some("see docs".to_owned()),
            raw_body: None,
        });
        assert_eq!(
            err.to_string(),
            "bad request, message: Value for 'target_lang' not supported., detail: see docs"
        );
    }

    #[test]
    fn status_maps_response_errors_only() {
        assert_eq!(
            DeepLError::QuotaExceeded(ErrorDetails::default()).status(),
            Some(456)
        );
        assert_eq!(DeepLError::MissingCredential.status(), None);
    }
}

use crate::{wire, DeepLError, ErrorDetails, HttpResponse, Result};

/// Passes responses with status in `[200, 400)` and maps everything else to
/// the matching [`DeepLError`].
pub fn check_response(response: &HttpResponse) -> Result<()> {
    if (200..400).contains(&response.status) {
        return Ok(());
    }

    let details = error_details(&response.body);
    Err(match response.status {
        403 => DeepLError::AuthorizationFailure(details),
        456 => DeepLError::QuotaExceeded(details),
        400 => DeepLError::BadRequest(details),
        429 => DeepLError::RateLimited(details),
        status => DeepLError::UnexpectedStatus {
            status,
            details: ErrorDetails {
                raw_body: Some(response.body.clone()),
                ..details
            },
        },
    })
}

/// Extracts `message`/`detail` from a JSON error body. A body that is not
/// JSON is kept verbatim instead.
pub(crate) fn error_details(body: &str) -> ErrorDetails {
    match serde_json::from_str::<wire::ErrorBody>(body) {
        Ok(parsed) => ErrorDetails {
            message: parsed.message,
            detail: parsed.detail,
            raw_body: None,
        },
        Err(_) if body.trim().is_empty() => ErrorDetails::default(),
        Err(_) => ErrorDetails {
            raw_body: Some(body.to_owned()),
            ..ErrorDetails::default()
        },
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    ValidationFailed(String),

    #[error("An account with that email already exists")]
    DuplicateIdentity,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Not signed in - token missing, expired, or rejected")]
    Unauthenticated,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            // Back up to a char boundary so multi-byte text never splits.
            let mut cut = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..cut],
                body.len()
            )
        }
    }

    /// Map a non-success HTTP status to an error variant.
    ///
    /// Auth endpoints override individual statuses before falling back here
    /// (a 401 from login means bad credentials, not a rejected token).
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            400 | 422 => ApiError::ValidationFailed(truncated),
            401 => ApiError::Unauthenticated,
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// True for errors worth retrying at the user's discretion (transport
    /// failures and timeouts). Nothing is retried automatically.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ApiError::NetworkFailure(_) | ApiError::ServerError(_))
    }
}

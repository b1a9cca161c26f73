use thiserror::Error;

/// Maximum number of error body characters surfaced to the operator.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request error: {0}")]
    Request(String),
    #[error("Response error: {0}")]
    Parse(String),
    #[error("{0}")]
    NotFound(String),
    #[error("not signed in")]
    Unauthenticated,
}

impl ApiError {
    /// Status code carried by the error; `0` for failures without a response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } => *status,
            Self::Timeout(_) => 408,
            Self::NotFound(_) => 404,
            Self::Unauthenticated => 401,
            Self::Network(_) | Self::Request(_) | Self::Parse(_) => 0,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Http { status: 422, .. } => "VALIDATION_ERROR",
            Self::Http { .. } | Self::Unauthenticated => "API_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Timeout(_) => "TIMEOUT_ERROR",
            Self::Request(_) => "REQUEST_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.status(), 400..=499)
    }

    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self.status(), 500..=599)
    }

    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self.status(), 401 | 403)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status() == 404
    }

    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        self.status() == 422
    }

    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        self.status() == 429
    }

    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Failures worth another attempt from the client's retry counter.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Builds an HTTP error from a response body, preferring the JSON `error`
    /// field reqres uses for failures.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("Server Error ({status})"));

        Self::Http {
            status,
            message: sanitize_message(&message),
        }
    }

    /// Operator-facing notice for the failure.
    #[must_use]
    pub fn notice_message(&self) -> String {
        match self {
            Self::Http { status, .. } => match status {
                400 => "Invalid request. Please check your input.".to_string(),
                401 => "Session expired. Please login again.".to_string(),
                403 => "You do not have permission to perform this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                422 => "Please check your input and try again.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500 => "Server error. Please try again later.".to_string(),
                502 | 503 => "Service temporarily unavailable. Please try again later.".to_string(),
                other => format!("Server error ({other}). Please try again."),
            },
            Self::Network(_) | Self::Timeout(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            Self::Unauthenticated => "Please login to continue.".to_string(),
            Self::NotFound(message) => message.clone(),
            Self::Request(_) | Self::Parse(_) => "Request failed. Please try again.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_builder() {
            Self::Request(err.to_string())
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else {
            Self::Network(format!("No response from server: {err}"))
        }
    }
}

/// Trims and truncates messages taken from response bodies.
fn sanitize_message(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

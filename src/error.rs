use thiserror::Error;

/// Main error type for Brightkite API operations
#[derive(Debug, Error)]
pub enum BrightkiteError {
    /// Non-200 HTTP response from the API
    #[error("HTTP {url}: {status} ({body})")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// An OAuth-only operation was invoked without OAuth configured
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A field was requested (or assigned) that the entity's snapshot
    /// does not contain
    #[error("invalid property '{0}'")]
    UnknownField(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl BrightkiteError {
    /// Create a new HTTP error
    pub fn http(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        BrightkiteError::Http {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Check if this error is a not found error (404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, BrightkiteError::Http { status: 404, .. })
    }

    /// Get the HTTP status code if this is an HTTP error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BrightkiteError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for Brightkite operations
pub type Result<T> = std::result::Result<T, BrightkiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_http_display() {
        let error = BrightkiteError::http("https://apps.brightkite.com/me.json", 401, "Unauthorized");
        assert_eq!(
            error.to_string(),
            "HTTP https://apps.brightkite.com/me.json: 401 (Unauthorized)"
        );
        assert_eq!(error.status_code(), Some(401));
    }

    #[test]
    fn test_error_not_found() {
        let error = BrightkiteError::http("https://apps.brightkite.com/people/nobody.json", 404, "");
        assert!(error.is_not_found());
    }

    #[test]
    fn test_error_unknown_field() {
        let error = BrightkiteError::UnknownField("nickname".to_string());
        assert_eq!(error.to_string(), "invalid property 'nickname'");
        assert_eq!(error.status_code(), None);
    }
}

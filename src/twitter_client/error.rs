use crate::twitter_client::api::ApiErrorEntry;
use crate::twitter_client::shape::Mismatch;
use itertools::Itertools;
use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between signing a request and handing back a typed value.
#[derive(Debug, Error)]
pub enum TwitterError {
    /// No HTTP response was obtained.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The body was not valid JSON / form data.
    #[error("could not parse response body: {message}")]
    Parsing { input: String, message: String },

    /// The body parsed but did not have the expected shape.
    #[error("response did not match expected shape: {}", .0.iter().join("; "))]
    Validation(Vec<Mismatch>),

    /// Non-2xx response carrying a well-formed error body.
    #[error("Twitter API error {status}: {}", format_api_errors(.errors))]
    Api {
        status: u16,
        errors: Vec<ApiErrorEntry>,
    },
}

impl TwitterError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub(crate) fn parsing(input: &str, message: impl ToString) -> Self {
        Self::Parsing {
            input: input.to_string(),
            message: message.to_string(),
        }
    }
}

fn format_api_errors(errors: &[ApiErrorEntry]) -> String {
    if errors.is_empty() {
        return "(no error details)".to_string();
    }
    errors
        .iter()
        .map(|error| format!("[{}] {}", error.code, error.message))
        .join(", ")
}

/// Failures below the HTTP response: building, signing, sending, reading the body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("OAuth signing failed: {0}")]
    Signing(String),

    #[error("no response within {0:?}")]
    Timeout(Duration),
}

pub type Outcome<T> = Result<T, TwitterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_error_status_helpers() {
        let rate_limited = TwitterError::Api {
            status: 429,
            errors: vec![ApiErrorEntry {
                code: 88,
                message: "Rate limit exceeded".to_string(),
            }],
        };
        assert!(rate_limited.is_rate_limited());
        assert!(!rate_limited.is_unauthorized());
        assert_eq!(rate_limited.status(), Some(429));
        assert_eq!(
            rate_limited.to_string(),
            "Twitter API error 429: [88] Rate limit exceeded"
        );

        let parsing = TwitterError::parsing("<html>", "expected value");
        assert_eq!(parsing.status(), None);
        assert!(!parsing.is_rate_limited());
    }

    #[test]
    fn test_validation_display_lists_every_mismatch() {
        let error = TwitterError::Validation(vec![
            Mismatch::new("$.id_str", "string", json!(null)),
            Mismatch::new("$.text", "string", json!(3)),
        ]);
        assert_eq!(
            error.to_string(),
            "response did not match expected shape: $.id_str: expected string, got null; $.text: expected string, got 3"
        );
    }
}

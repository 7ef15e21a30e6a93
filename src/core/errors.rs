use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for the chat engine and its HTTP boundary.
///
/// Every failure is surfaced to the caller as a structured body; nothing is
/// swallowed or retried inside the core.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to fetch {url}: {reason}")]
    FetchFailure { url: String, reason: String },
    #[error("url has not been indexed: {0}")]
    NotIndexed(String),
    #[error("generation failed: {0}")]
    GenerationFailure(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ChatError {
    pub fn fetch<E: std::fmt::Display>(url: &str, reason: E) -> Self {
        ChatError::FetchFailure {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn generation<E: std::fmt::Display>(err: E) -> Self {
        ChatError::GenerationFailure(err.to_string())
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ChatError::InvalidConfiguration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ChatError::FetchFailure { .. } => StatusCode::BAD_GATEWAY,
            ChatError::NotIndexed(_) => StatusCode::NOT_FOUND,
            ChatError::GenerationFailure(_) => StatusCode::BAD_GATEWAY,
            ChatError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_helper_carries_url_and_reason() {
        let err = ChatError::fetch("https://example.com", "connection refused");
        assert_eq!(
            err.to_string(),
            "failed to fetch https://example.com: connection refused"
        );
    }

    #[test]
    fn status_mapping() {
        let cases = [
            (
                ChatError::InvalidConfiguration("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ChatError::fetch("u", "r"), StatusCode::BAD_GATEWAY),
            (ChatError::NotIndexed("u".into()), StatusCode::NOT_FOUND),
            (
                ChatError::GenerationFailure("x".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (ChatError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), expected);
        }
    }
}

//! Error types for API Clients
use std::fmt;
use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error occured while building, sending or recieving an HTTP request
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-success status
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// An error occured while recieving the response body
    #[error("Error reading response body: {0}")]
    ResponseBody(#[source] BoxError),

    /// The response body was not the expected JSON document
    #[error("Error decoding response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// An error occured while sending the request
    #[error(transparent)]
    Request(#[from] hyperdriver::client::Error),

    /// Query parameters could not be encoded
    #[error("Error encoding query: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    /// The request URI or headers were invalid
    #[error("Invalid request: {0}")]
    Build(#[from] http::Error),

    /// The request did not complete in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// A server returned an error response
#[derive(Debug, Clone)]
pub struct HttpResponseError {
    /// The HTTP status code of the response
    pub status: StatusCode,

    /// The message body of the response
    pub message: String,
}

impl HttpResponseError {
    /// Create a new HTTP response error from a status and body text
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl fmt::Display for HttpResponseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HTTP {} response: {}", self.status, self.message)
    }
}

impl std::error::Error for HttpResponseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_error_display() {
        let error = HttpResponseError::new(StatusCode::NOT_FOUND, "{\"message\":\"Not Found\"}");
        assert_eq!(
            error.to_string(),
            "HTTP 404 Not Found response: {\"message\":\"Not Found\"}"
        );

        let error: Error = error.into();
        assert!(error.to_string().starts_with("HTTP 404"));
    }
}

//! The `{status, data}` document every analysis endpoint responds with.

use serde::Serialize;

/// Marker in the response envelope.
///
/// Every handled request reports `success`, including failed analyses. A
/// failure is told apart by the `{"error": ...}` payload in `data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The request was handled
    Success,
}

/// Either the analysis result or an error message.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Payload<T> {
    /// The analysis result
    Data(T),
    /// Why the analysis failed
    Error {
        /// Human readable failure message
        error: String,
    },
}

/// Response document returned by the analysis endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always `success`
    pub status: Status,
    /// Result or error payload
    pub data: Payload<T>,
}

impl<T> Envelope<T> {
    /// Wrap a successful result.
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data: Payload::Data(data),
        }
    }

    /// Wrap a failure message.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            data: Payload::Error {
                error: error.into(),
            },
        }
    }
}

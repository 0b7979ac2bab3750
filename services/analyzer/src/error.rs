//! Error types for the analyzer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::envelope::Envelope;
use crate::source::SourceError;

/// Result type for analyzer operations
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// Reasons an analysis can fail.
///
/// Every variant reaches clients the same way, as an `{"error": message}`
/// payload in a `200 OK` response.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// The repository URL does not name an owner and a repository
    #[error("invalid repository URL {0:?}: expected .../owner/repo")]
    InvalidRepositoryUrl(String),

    /// The repository data source failed
    #[error("{0}")]
    Source(#[source] SourceError),
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Analysis failed");
        (StatusCode::OK, axum::Json(Envelope::<()>::failure(self.to_string()))).into_response()
    }
}

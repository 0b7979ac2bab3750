//! HTTP routes and the router builder

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::config::{AnalyzerConfig, UtcOffset};
use crate::envelope::Envelope;
use crate::error::AnalyzeResult;
use crate::service::Analyzer;
use crate::source::{RepoMetadata, RepositorySource};
use crate::stats::{CodeChurn, CommitActivity};

/// Body accepted by every analysis endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    /// Repository URL, e.g. `https://github.com/owner/repo`
    pub repo_url: String,

    /// Size of the commit window. Ignored by the metadata endpoint.
    #[serde(default)]
    pub max_commits: Option<usize>,
}

/// Builder for the analyzer HTTP service
#[derive(Debug)]
pub struct AnalyzerBuilder {
    source: Arc<dyn RepositorySource>,
    utc_offset: Option<UtcOffset>,
    max_commit_limit: Option<usize>,
}

impl AnalyzerBuilder {
    /// Create a builder serving data from `source`
    pub fn new(source: Arc<dyn RepositorySource>) -> Self {
        Self {
            source,
            utc_offset: None,
            max_commit_limit: None,
        }
    }

    /// Set the offset commit hours are reported in
    pub fn utc_offset(mut self, offset: UtcOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    /// Set the largest commit window a request may ask for
    pub fn max_commit_limit(mut self, limit: usize) -> Self {
        self.max_commit_limit = Some(limit);
        self
    }

    /// Apply the analysis settings from a configuration
    pub fn config(self, config: &AnalyzerConfig) -> Self {
        self.utc_offset(config.utc_offset)
            .max_commit_limit(config.max_commit_limit as usize)
    }

    /// Build the analyzer service
    ///
    /// Returns a Router that can be served with any tower-compatible server
    pub fn build(self) -> Router {
        let mut analyzer = Analyzer::new(self.source);
        if let Some(offset) = self.utc_offset {
            analyzer = analyzer.with_utc_offset(offset);
        }
        if let Some(limit) = self.max_commit_limit {
            analyzer = analyzer.with_max_commit_limit(limit);
        }

        Router::new()
            .route("/", get(service_info))
            .route("/api/analyze", post(analyze_repository))
            .route("/api/analyze/commits", post(analyze_commits))
            .route("/api/analyze/churn", post(analyze_churn))
            .layer(TraceLayer::new_for_http())
            .with_state(analyzer)
    }
}

#[derive(Debug, Serialize)]
struct ServiceInfo {
    message: &'static str,
    version: &'static str,
}

/// Liveness document
async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "GitHub Analyzer API is running!",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Repository metadata
async fn analyze_repository(
    State(analyzer): State<Analyzer>,
    Json(request): Json<AnalyzeRequest>,
) -> AnalyzeResult<Json<Envelope<RepoMetadata>>> {
    let metadata = analyzer.repository_info(&request.repo_url).await?;
    Ok(Json(Envelope::success(metadata)))
}

/// Commit hour distribution and top contributors
async fn analyze_commits(
    State(analyzer): State<Analyzer>,
    Json(request): Json<AnalyzeRequest>,
) -> AnalyzeResult<Json<Envelope<CommitActivity>>> {
    let activity = analyzer
        .commit_activity(&request.repo_url, request.max_commits)
        .await?;
    Ok(Json(Envelope::success(activity)))
}

/// Lines added and removed per commit
async fn analyze_churn(
    State(analyzer): State<Analyzer>,
    Json(request): Json<AnalyzeRequest>,
) -> AnalyzeResult<Json<Envelope<CodeChurn>>> {
    let churn = analyzer
        .code_churn(&request.repo_url, request.max_commits)
        .await?;
    Ok(Json(Envelope::success(churn)))
}

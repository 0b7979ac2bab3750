//! Repository analysis: fetch from the source, reduce to statistics.

use std::sync::Arc;

use crate::config::{DEFAULT_MAX_COMMIT_LIMIT, UtcOffset};
use crate::error::{AnalyzeError, AnalyzeResult};
use crate::slug::RepositorySlug;
use crate::source::{RepoMetadata, RepositorySource};
use crate::stats::{self, CodeChurn, CommitActivity};

/// Commit window for activity analysis when the request names none.
pub const DEFAULT_ACTIVITY_COMMITS: usize = 100;

/// Commit window for churn analysis when the request names none.
///
/// Smaller than the activity window since every commit costs a request.
pub const DEFAULT_CHURN_COMMITS: usize = 50;

/// Runs analyses against a [RepositorySource].
///
/// Cheap to clone; clones share the source.
#[derive(Debug, Clone)]
pub struct Analyzer {
    source: Arc<dyn RepositorySource>,
    utc_offset: UtcOffset,
    max_commit_limit: usize,
}

impl Analyzer {
    /// Create an analyzer with the default offset and commit limit.
    pub fn new(source: Arc<dyn RepositorySource>) -> Self {
        Self {
            source,
            utc_offset: UtcOffset::default(),
            max_commit_limit: DEFAULT_MAX_COMMIT_LIMIT as usize,
        }
    }

    /// Set the offset commit times are reported in.
    pub fn with_utc_offset(mut self, utc_offset: UtcOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    /// Set the largest commit window a request may ask for.
    pub fn with_max_commit_limit(mut self, limit: usize) -> Self {
        self.max_commit_limit = limit;
        self
    }

    fn window(&self, requested: Option<usize>, default: usize) -> usize {
        let window = requested.unwrap_or(default);
        if window > self.max_commit_limit {
            tracing::debug!(
                requested = window,
                limit = self.max_commit_limit,
                "Clamping commit window"
            );
        }
        window.min(self.max_commit_limit)
    }

    /// Repository metadata for the repository at `repo_url`.
    #[tracing::instrument(skip(self))]
    pub async fn repository_info(&self, repo_url: &str) -> AnalyzeResult<RepoMetadata> {
        let slug = RepositorySlug::parse(repo_url)?;
        self.source
            .repository(&slug)
            .await
            .map_err(AnalyzeError::Source)
    }

    /// Commit timing and top contributors over the most recent commits.
    #[tracing::instrument(skip(self))]
    pub async fn commit_activity(
        &self,
        repo_url: &str,
        max_commits: Option<usize>,
    ) -> AnalyzeResult<CommitActivity> {
        let slug = RepositorySlug::parse(repo_url)?;
        let window = self.window(max_commits, DEFAULT_ACTIVITY_COMMITS);

        let commits = self
            .source
            .recent_commits(&slug, window)
            .await
            .map_err(AnalyzeError::Source)?;
        tracing::debug!(repository = %slug, count = commits.len(), "Analyzing commit activity");

        Ok(stats::commit_activity(&commits, window, self.utc_offset))
    }

    /// Lines added and removed over the most recent commits.
    #[tracing::instrument(skip(self))]
    pub async fn code_churn(
        &self,
        repo_url: &str,
        max_commits: Option<usize>,
    ) -> AnalyzeResult<CodeChurn> {
        let slug = RepositorySlug::parse(repo_url)?;
        let window = self.window(max_commits, DEFAULT_CHURN_COMMITS);

        let commits = self
            .source
            .recent_commits_with_stats(&slug, window)
            .await
            .map_err(AnalyzeError::Source)?;
        tracing::debug!(repository = %slug, count = commits.len(), "Analyzing code churn");

        Ok(stats::code_churn(&commits, self.utc_offset))
    }
}

//! Where repository metadata and commit history come from.
//!
//! The analyzer is handed a [RepositorySource] when it is built. Production
//! uses the Github REST API through [octocat::GithubClient], tests substitute
//! an in-memory source.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{StreamExt as _, TryStreamExt as _};
use octocat::GithubClient;
use serde::Serialize;

use crate::slug::RepositorySlug;

/// Error produced by a repository source.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Author name used for commits which record none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Number of commit detail requests kept in flight while collecting line stats.
const COMMIT_DETAIL_CONCURRENCY: usize = 4;

/// A single commit, reduced to the fields the statistics need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Commit SHA
    pub sha: String,
    /// Author display name
    pub author_name: String,
    /// When the commit was authored, if recorded
    pub author_timestamp: Option<DateTime<Utc>>,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Full commit message
    pub message: String,
}

impl From<octocat::models::Commit> for CommitRecord {
    fn from(commit: octocat::models::Commit) -> Self {
        let stats = commit.stats.unwrap_or_default();
        CommitRecord {
            author_name: commit.author_name().unwrap_or(UNKNOWN_AUTHOR).to_owned(),
            author_timestamp: commit.authored_at(),
            additions: stats.additions,
            deletions: stats.deletions,
            message: commit.commit.message,
            sha: commit.sha,
        }
    }
}

/// Repository metadata returned by the `/api/analyze` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoMetadata {
    /// Repository name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Repository description
    pub description: Option<String>,
    /// Star count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// Primary language
    pub language: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
    /// Web URL
    pub html_url: Option<String>,
    /// Default branch name
    pub default_branch: Option<String>,
    /// Open issues and pull requests
    pub open_issues: u64,
    /// Watcher count
    pub watchers: u64,
}

impl From<octocat::models::Repository> for RepoMetadata {
    fn from(repo: octocat::models::Repository) -> Self {
        RepoMetadata {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            html_url: repo.html_url,
            default_branch: repo.default_branch,
            open_issues: repo.open_issues_count,
            watchers: repo.watchers_count,
        }
    }
}

/// Provides repository metadata and recent commits.
///
/// Commit sequences are newest first and hold at most `limit` records.
#[async_trait]
pub trait RepositorySource: fmt::Debug + Send + Sync {
    /// Fetch repository metadata.
    async fn repository(&self, slug: &RepositorySlug) -> Result<RepoMetadata, SourceError>;

    /// Fetch recent commits. Line counts may be left at zero.
    async fn recent_commits(
        &self,
        slug: &RepositorySlug,
        limit: usize,
    ) -> Result<Vec<CommitRecord>, SourceError>;

    /// Fetch recent commits with their line counts filled in.
    async fn recent_commits_with_stats(
        &self,
        slug: &RepositorySlug,
        limit: usize,
    ) -> Result<Vec<CommitRecord>, SourceError>;
}

#[async_trait]
impl RepositorySource for GithubClient {
    async fn repository(&self, slug: &RepositorySlug) -> Result<RepoMetadata, SourceError> {
        let repo = GithubClient::repository(self, slug.owner(), slug.repo()).await?;
        Ok(repo.into())
    }

    async fn recent_commits(
        &self,
        slug: &RepositorySlug,
        limit: usize,
    ) -> Result<Vec<CommitRecord>, SourceError> {
        let commits = self.commits(slug.owner(), slug.repo(), limit).await?;
        Ok(commits.into_iter().map(CommitRecord::from).collect())
    }

    async fn recent_commits_with_stats(
        &self,
        slug: &RepositorySlug,
        limit: usize,
    ) -> Result<Vec<CommitRecord>, SourceError> {
        let listed = self.commits(slug.owner(), slug.repo(), limit).await?;

        // The listing omits stats, so each commit is fetched individually.
        let detailed: Vec<octocat::models::Commit> = futures::stream::iter(listed)
            .map(|commit| async move {
                self.commit(slug.owner(), slug.repo(), &commit.sha).await
            })
            .buffered(COMMIT_DETAIL_CONCURRENCY)
            .try_collect()
            .await?;

        tracing::debug!(repository = %slug, count = detailed.len(), "Fetched commit stats");
        Ok(detailed.into_iter().map(CommitRecord::from).collect())
    }
}

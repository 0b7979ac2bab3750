//! Commit data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit object, as returned by the commit listing and single commit endpoints.
///
/// Only the single commit endpoint includes [Commit::stats].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// The SHA of the commit.
    pub sha: String,

    /// The commit details.
    pub commit: CommitDetails,

    /// Line change totals for the commit.
    #[serde(default)]
    pub stats: Option<CommitStats>,
}

impl Commit {
    /// The git author name, if the commit records one.
    pub fn author_name(&self) -> Option<&str> {
        self.commit.author.as_ref().map(|author| author.name.as_str())
    }

    /// The git author date, if the commit records one.
    pub fn authored_at(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|author| author.date)
    }
}

/// The author and message for a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetails {
    /// The author of the commit.
    #[serde(default)]
    pub author: Option<AuthorCommitDetails>,
    /// The commit message.
    #[serde(default)]
    pub message: String,
}

/// The author and date for a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorCommitDetails {
    /// Author name
    pub name: String,
    /// Author email
    #[serde(default)]
    pub email: Option<String>,
    /// The date of the commit.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Lines added and removed by a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    /// Lines added
    #[serde(default)]
    pub additions: u64,
    /// Lines deleted
    #[serde(default)]
    pub deletions: u64,
    /// Lines changed
    #[serde(default)]
    pub total: u64,
}

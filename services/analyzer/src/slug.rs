//! Owner and repository names taken from a repository URL.

use std::fmt;
use std::str::FromStr;

use crate::error::AnalyzeError;

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// The `owner/repo` pair identifying a Github repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositorySlug {
    owner: String,
    repo: String,
}

impl RepositorySlug {
    /// Create a slug from its parts.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse a repository URL such as `https://github.com/rust-lang/rust`.
    ///
    /// Any query or fragment is dropped, trailing slashes are ignored, and the
    /// last two path segments are taken as owner and repository, so
    /// `rust-lang/rust` parses as well. A `.git` suffix on the repository is
    /// dropped. Segments may only hold ASCII letters, digits, `-`, `_` and `.`,
    /// and may not be `.` or `..`.
    pub fn parse(url: &str) -> Result<Self, AnalyzeError> {
        let path = url.trim().split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.trim_end_matches('/').rsplit('/');

        let (Some(repo), Some(owner)) = (segments.next(), segments.next()) else {
            return Err(AnalyzeError::InvalidRepositoryUrl(url.to_owned()));
        };

        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if !is_valid_segment(owner) || !is_valid_segment(repo) {
            return Err(AnalyzeError::InvalidRepositoryUrl(url.to_owned()));
        }

        Ok(Self::new(owner, repo))
    }

    /// Repository owner, a user or organization login.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl FromStr for RepositorySlug {
    type Err = AnalyzeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

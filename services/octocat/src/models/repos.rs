//! Repository data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A repository, as returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Repository name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Repository description
    #[serde(default)]
    pub description: Option<String>,
    /// Web URL for the repository
    #[serde(default)]
    pub html_url: Option<String>,
    /// Star count
    #[serde(default)]
    pub stargazers_count: u64,
    /// Watcher count
    #[serde(default)]
    pub watchers_count: u64,
    /// Fork count
    #[serde(default)]
    pub forks_count: u64,
    /// Open issues and pull requests
    #[serde(default)]
    pub open_issues_count: u64,
    /// Primary language
    #[serde(default)]
    pub language: Option<String>,
    /// Default branch name
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_repository() {
        let body = indoc::indoc! {r#"
            {
              "id": 1296269,
              "name": "Hello-World",
              "full_name": "octocat/Hello-World",
              "description": null,
              "html_url": "https://github.com/octocat/Hello-World",
              "stargazers_count": 80,
              "watchers_count": 80,
              "forks_count": 9,
              "open_issues_count": 0,
              "language": null,
              "default_branch": "master",
              "created_at": "2011-01-26T19:01:12Z",
              "updated_at": "2011-01-26T19:14:43Z"
            }
        "#};

        let repo: Repository = serde_json::from_str(body).unwrap();
        assert_eq!(repo.full_name, "octocat/Hello-World");
        assert_eq!(repo.stargazers_count, 80);
        assert_eq!(repo.forks_count, 9);
        assert!(repo.description.is_none());
        assert!(repo.language.is_none());
    }
}

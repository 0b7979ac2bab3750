//! Integration tests for the analyzer HTTP API

use std::sync::{Arc, Mutex};

use analyzer::{
    AnalyzerBuilder, CommitRecord, RepoMetadata, RepositorySlug, RepositorySource, SourceError,
    UtcOffset,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

/// In-memory repository source recording the windows it was asked for.
#[derive(Debug, Default)]
struct FakeSource {
    commits: Vec<CommitRecord>,
    fail: bool,
    limits: Mutex<Vec<usize>>,
}

impl FakeSource {
    fn with_commits(commits: Vec<CommitRecord>) -> Self {
        FakeSource {
            commits,
            ..Default::default()
        }
    }

    fn failing() -> Self {
        FakeSource {
            fail: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), SourceError> {
        if self.fail {
            return Err("Github responded with 404 Not Found: Not Found".into());
        }
        Ok(())
    }

    fn window(&self, limit: usize) -> Vec<CommitRecord> {
        self.limits.lock().unwrap().push(limit);
        self.commits.iter().take(limit).cloned().collect()
    }
}

#[async_trait]
impl RepositorySource for FakeSource {
    async fn repository(&self, slug: &RepositorySlug) -> Result<RepoMetadata, SourceError> {
        self.check()?;
        Ok(RepoMetadata {
            name: slug.repo().to_owned(),
            full_name: slug.to_string(),
            description: Some("A test repository".into()),
            stars: 42,
            forks: 7,
            language: Some("Rust".into()),
            created_at: "2020-01-01T00:00:00Z".parse().unwrap(),
            updated_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            html_url: Some(format!("https://github.com/{slug}")),
            default_branch: Some("main".into()),
            open_issues: 3,
            watchers: 42,
        })
    }

    async fn recent_commits(
        &self,
        _slug: &RepositorySlug,
        limit: usize,
    ) -> Result<Vec<CommitRecord>, SourceError> {
        self.check()?;
        Ok(self.window(limit))
    }

    async fn recent_commits_with_stats(
        &self,
        _slug: &RepositorySlug,
        limit: usize,
    ) -> Result<Vec<CommitRecord>, SourceError> {
        self.check()?;
        Ok(self.window(limit))
    }
}

fn commit(author: &str, timestamp: &str, additions: u64, deletions: u64) -> CommitRecord {
    CommitRecord {
        sha: format!("{author}-{timestamp}"),
        author_name: author.to_owned(),
        author_timestamp: Some(timestamp.parse().unwrap()),
        additions,
        deletions,
        message: format!("Commit by {author}\n\nbody"),
    }
}

fn sample_commits() -> Vec<CommitRecord> {
    vec![
        commit("alice", "2024-05-01T10:00:00Z", 10, 2),
        commit("alice", "2024-05-01T10:15:00Z", 5, 5),
        commit("bob", "2024-05-01T18:00:00Z", 0, 3),
    ]
}

fn app(source: Arc<FakeSource>) -> axum::Router {
    AnalyzerBuilder::new(source).build()
}

async fn post(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_service_info() {
    let response = app(Arc::default())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["message"], "GitHub Analyzer API is running!");
    assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_analyze_repository() {
    let (status, body) = post(
        app(Arc::default()),
        "/api/analyze",
        json!({"repo_url": "https://github.com/rust-lang/rust"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["name"], "rust");
    assert_eq!(body["data"]["full_name"], "rust-lang/rust");
    assert_eq!(body["data"]["stars"], 42);
    assert_eq!(body["data"]["forks"], 7);
    assert_eq!(body["data"]["language"], "Rust");
}

#[tokio::test]
async fn test_analyze_commits() {
    let source = Arc::new(FakeSource::with_commits(sample_commits()));
    let (status, body) = post(
        app(source.clone()),
        "/api/analyze/commits",
        json!({"repo_url": "https://github.com/owner/repo.git"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let data = &body["data"];
    assert_eq!(data["total_commits"], 100);
    assert_eq!(data["commits_analyzed"], 3);
    assert_eq!(data["peak_hour"], json!({"hour": 15, "commits": 2}));
    assert_eq!(data["hourly_distribution"], json!({"15": 2, "23": 1}));
    assert_eq!(
        data["top_contributors"],
        json!([{"name": "alice", "commits": 2}, {"name": "bob", "commits": 1}])
    );
    assert_eq!(data["utc_offset"], "+05:30");

    assert_eq!(*source.limits.lock().unwrap(), vec![100]);
}

#[tokio::test]
async fn test_commit_window_is_clamped() {
    let source = Arc::new(FakeSource::with_commits(sample_commits()));
    let app = AnalyzerBuilder::new(source.clone())
        .max_commit_limit(2)
        .utc_offset(UtcOffset::utc())
        .build();

    let (_, body) = post(
        app,
        "/api/analyze/commits",
        json!({"repo_url": "https://github.com/owner/repo", "max_commits": 1000}),
    )
    .await;

    assert_eq!(body["data"]["total_commits"], 2);
    assert_eq!(body["data"]["commits_analyzed"], 2);
    assert_eq!(body["data"]["peak_hour"], json!({"hour": 10, "commits": 2}));
    assert_eq!(body["data"]["utc_offset"], "+00:00");
    assert_eq!(*source.limits.lock().unwrap(), vec![2]);
}

#[tokio::test]
async fn test_analyze_churn() {
    let source = Arc::new(FakeSource::with_commits(sample_commits()));
    let (status, body) = post(
        app(source.clone()),
        "/api/analyze/churn",
        json!({"repo_url": "https://github.com/owner/repo"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let data = &body["data"];
    assert_eq!(data["commits_analyzed"], 3);
    assert_eq!(data["total_additions"], 15);
    assert_eq!(data["total_deletions"], 10);
    assert_eq!(data["net_change"], 5);
    assert_eq!(data["avg_additions_per_commit"], 5.0);
    assert_eq!(data["avg_deletions_per_commit"], 3.33);

    let first = &data["timeline"][0];
    assert_eq!(first["message"], "Commit by alice");
    assert_eq!(first["date"], "2024-05-01");
    assert_eq!(first["time"], "15:30:00");
    assert_eq!(first["total_changes"], 12);

    assert_eq!(*source.limits.lock().unwrap(), vec![50]);
}

#[tokio::test]
async fn test_malformed_url_is_reported_in_envelope() {
    for path in ["/api/analyze", "/api/analyze/commits", "/api/analyze/churn"] {
        let (status, body) = post(
            app(Arc::default()),
            path,
            json!({"repo_url": "https://github.com/"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["status"], "success", "{path}");
        let message = body["data"]["error"].as_str().unwrap();
        assert!(message.contains("invalid repository URL"), "{path}: {message}");
    }
}

#[tokio::test]
async fn test_source_failure_is_reported_in_envelope() {
    let (status, body) = post(
        app(Arc::new(FakeSource::failing())),
        "/api/analyze/commits",
        json!({"repo_url": "https://github.com/owner/missing"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["data"]["error"],
        "Github responded with 404 Not Found: Not Found"
    );
}

#[tokio::test]
async fn test_missing_repo_url_is_rejected() {
    let (status, _) = post(app(Arc::default()), "/api/analyze", json!({"max_commits": 5})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_zero_commit_window_is_empty() {
    let source = Arc::new(FakeSource::with_commits(sample_commits()));

    let (status, body) = post(
        app(source.clone()),
        "/api/analyze/commits",
        json!({"repo_url": "https://github.com/owner/repo", "max_commits": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["total_commits"], 0);
    assert_eq!(body["data"]["commits_analyzed"], 0);
    assert_eq!(body["data"]["peak_hour"], json!({"hour": 0, "commits": 0}));
    assert_eq!(body["data"]["hourly_distribution"], json!({}));
    assert_eq!(body["data"]["top_contributors"], json!([]));

    let (_, body) = post(
        app(source.clone()),
        "/api/analyze/churn",
        json!({"repo_url": "https://github.com/owner/repo", "max_commits": 0}),
    )
    .await;
    assert_eq!(body["data"]["commits_analyzed"], 0);
    assert_eq!(body["data"]["total_additions"], 0);
    assert_eq!(body["data"]["avg_additions_per_commit"], 0.0);
    assert_eq!(body["data"]["timeline"], json!([]));

    assert_eq!(*source.limits.lock().unwrap(), vec![0, 0]);
}

#[tokio::test]
async fn test_url_query_is_ignored() {
    let (_, body) = post(
        app(Arc::default()),
        "/api/analyze",
        json!({"repo_url": "https://github.com/rust-lang/rust?tab=readme-ov-file#about"}),
    )
    .await;

    assert_eq!(body["data"]["full_name"], "rust-lang/rust");
}

#[tokio::test]
async fn test_path_traversal_is_reported_in_envelope() {
    let (status, body) = post(
        app(Arc::default()),
        "/api/analyze/commits",
        json!({"repo_url": "https://github.com/owner/.."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["error"].as_str().unwrap().contains("invalid repository URL"));
}

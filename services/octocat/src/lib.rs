//! Simple client for reading public repository data from the Github REST API.

use api_client::{ApiClient, BearerAuth};

use http::header;
use http::{HeaderName, HeaderValue, StatusCode, Uri};
use hyperdriver::client::conn::transport::tcp::TcpTransportConfig;
use hyperdriver::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod config;
pub mod models;

pub use crate::config::{GithubConfig, GITHUB_TOKEN_VAR};
pub use api_client::Secret;
use crate::models::{Commit, Repository};

const CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const GITHUB_API_VERSION_HEADER: &str = "x-github-api-version";
const GITHUB_BASE: &str = "https://api.github.com/";
const USER_AGENT: &str = concat!("repo-analyzer-octocat/", env!("CARGO_PKG_VERSION"));

/// Largest page size the commit listing endpoint accepts.
pub const COMMITS_PER_PAGE: usize = 100;

/// Errors that can occur when using the Github client.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent, or the response could not be read.
    #[error("Github request failed: {0}")]
    Request(#[source] api_client::Error),

    /// A response not in the 200-299 range.
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// The configured API base is not a valid URI.
    #[error("Invalid Github API base: {0}")]
    InvalidBase(#[from] http::uri::InvalidUri),
}

impl From<api_client::Error> for Error {
    fn from(error: api_client::Error) -> Self {
        match error {
            api_client::Error::Response(response) => {
                ResponseError::new(response.status, &response.message).into()
            }
            other => Error::Request(other),
        }
    }
}

/// An error that occurs when a response is not successful.
///
/// Github error bodies carry a `message` field, which is preferred over the raw body.
#[derive(Debug, Clone, Error)]
#[error("Github responded with {status}: {message}")]
pub struct ResponseError {
    status: StatusCode,
    message: String,
}

#[derive(Debug, Deserialize)]
struct GithubErrorBody {
    message: String,
}

impl ResponseError {
    fn new(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<GithubErrorBody>(body)
            .map(|body| body.message)
            .unwrap_or_else(|_| body.trim().to_owned());
        Self { status, message }
    }

    /// The HTTP status Github responded with.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The error message Github sent.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A Github client for read-only repository queries.
///
/// Requests are authenticated with a bearer token when one is provided.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: ApiClient<Option<BearerAuth>>,
}

impl GithubClient {
    /// Create a client for the public Github API.
    pub fn new(token: Option<Secret>) -> Self {
        Self::with_base(Uri::from_static(GITHUB_BASE), token)
    }

    /// Create a client against a Github compatible API at `base`.
    pub fn with_base(base: Uri, token: Option<Secret>) -> Self {
        let mut tcp = TcpTransportConfig::default();
        tcp.connect_timeout = Some(CONNECT_TIMEOUT);

        let client = Client::builder()
            .layer(
                tower_http::set_header::SetRequestHeaderLayer::if_not_present(
                    header::ACCEPT,
                    HeaderValue::from_static(GITHUB_ACCEPT),
                ),
            )
            .layer(
                tower_http::set_header::SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(GITHUB_API_VERSION_HEADER),
                    HeaderValue::from_static(GITHUB_API_VERSION),
                ),
            )
            .with_tcp(tcp)
            .with_auto_http()
            .with_user_agent(USER_AGENT.to_owned())
            .build_service();

        Self::with_service(base, token, client)
    }

    /// Create a client which sends requests through `service`.
    ///
    /// Used to point the client at canned responses in tests.
    pub fn with_service<S>(base: Uri, token: Option<Secret>, service: S) -> Self
    where
        S: tower::Service<
                http::Request<hyperdriver::Body>,
                Response = http::Response<hyperdriver::Body>,
                Error = hyperdriver::client::Error,
            > + Clone
            + Send
            + Sync
            + 'static,
        S::Future: Send + 'static,
    {
        let auth = token.map(BearerAuth::new);
        Self {
            client: ApiClient::new_with_inner_service(base, auth, service),
        }
    }

    /// Whether requests carry a token.
    pub fn is_authenticated(&self) -> bool {
        self.client.auth().is_some()
    }

    /// The API base endpoints are resolved against.
    pub fn api_base(&self) -> &Uri {
        self.client.base()
    }

    async fn get_json<T, Q>(&self, endpoint: &str, query: &Q) -> Result<T, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .client
            .get(endpoint)
            .query(query)
            .timeout(TIMEOUT)
            .send()
            .await?
            .error_for_status()
            .await?;

        Ok(response.json().await?)
    }

    /// Fetch repository metadata.
    #[tracing::instrument(skip(self))]
    pub async fn repository(&self, owner: &str, repo: &str) -> Result<Repository, Error> {
        let repository: Repository = self
            .get_json(&format!("repos/{owner}/{repo}"), &[] as &[(&str, &str)])
            .await?;
        tracing::debug!(stars = repository.stargazers_count, "Fetched repository");
        Ok(repository)
    }

    /// Fetch up to `limit` commits from the default branch, newest first.
    ///
    /// Pages through the listing until `limit` commits are collected or the
    /// history runs out. Listed commits do not carry [Commit::stats].
    #[tracing::instrument(skip(self))]
    pub async fn commits(
        &self,
        owner: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<Commit>, Error> {
        let endpoint = format!("repos/{owner}/{repo}/commits");
        let per_page = limit.min(COMMITS_PER_PAGE);
        let mut commits = Vec::with_capacity(limit.min(COMMITS_PER_PAGE * 10));
        let mut page = 1usize;

        while commits.len() < limit {
            let batch: Vec<Commit> = self
                .get_json(&endpoint, &[("per_page", per_page), ("page", page)])
                .await?;
            tracing::trace!(page, count = batch.len(), "Fetched commit page");

            let exhausted = batch.len() < per_page;
            let remaining = limit - commits.len();
            commits.extend(batch.into_iter().take(remaining));

            if exhausted {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = commits.len(), "Fetched commits");
        Ok(commits)
    }

    /// Fetch a single commit, including its line change stats.
    #[tracing::instrument(skip(self))]
    pub async fn commit(&self, owner: &str, repo: &str, sha: &str) -> Result<Commit, Error> {
        self.get_json(
            &format!("repos/{owner}/{repo}/commits/{sha}"),
            &[] as &[(&str, &str)],
        )
        .await
    }
}

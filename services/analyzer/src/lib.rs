//! # Github Repository Analyzer
//!
//! An HTTP API reporting descriptive statistics for public Github repositories:
//!
//! - `POST /api/analyze`: repository metadata
//! - `POST /api/analyze/commits`: commit hour distribution and top contributors
//! - `POST /api/analyze/churn`: lines added and removed per commit
//!
//! Each endpoint takes `{"repo_url": "...", "max_commits": n}` and answers with
//! `{"status": "success", "data": ...}`. Failures are reported in `data` as
//! `{"error": "..."}`, still with a `200 OK` status.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use analyzer::AnalyzerBuilder;
//! use octocat::GithubClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let github = GithubClient::new(None);
//! let app = AnalyzerBuilder::new(Arc::new(github)).build();
//!
//! // Serve `app` with axum or any tower-compatible server
//! # Ok(())
//! # }
//! ```

mod api;
pub mod config;
mod envelope;
mod error;
mod service;
pub mod slug;
pub mod source;
pub mod stats;

pub use api::{AnalyzeRequest, AnalyzerBuilder};
pub use config::{AnalyzerConfig, UtcOffset};
pub use envelope::{Envelope, Payload, Status};
pub use error::{AnalyzeError, AnalyzeResult};
pub use service::Analyzer;
pub use slug::RepositorySlug;
pub use source::{CommitRecord, RepoMetadata, RepositorySource, SourceError};

use api_client::Secret;
use serde::Deserialize;

use super::{Error, GithubClient};

/// Environment variable holding an optional Github API token.
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Configuration for a [GithubClient]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GithubConfig {
    /// Personal access token. Requests are anonymous without one, and
    /// subject to the public rate limit.
    #[serde(default)]
    pub token: Option<Secret>,

    /// Base URL of a Github compatible REST API.
    #[serde(default)]
    pub api_base: Option<String>,
}

impl TryFrom<&GithubConfig> for GithubClient {
    type Error = Error;

    fn try_from(config: &GithubConfig) -> Result<Self, Self::Error> {
        let base = match &config.api_base {
            Some(base) if base.ends_with('/') => base.parse()?,
            Some(base) => format!("{base}/").parse()?,
            None => http::Uri::from_static(crate::GITHUB_BASE),
        };

        if config.token.is_none() {
            tracing::warn!(
                "No Github token configured, requests are subject to the anonymous rate limit"
            );
        }

        Ok(GithubClient::with_base(base, config.token.clone()))
    }
}

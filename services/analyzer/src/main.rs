//! Serve the repository analyzer over HTTP.
//!
//! Run with: cargo run -p analyzer --features cli -- --bind 127.0.0.1:8000

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use analyzer::{AnalyzerBuilder, AnalyzerConfig, UtcOffset};
use clap::Parser;
use eyre::WrapErr as _;
use octocat::{GithubClient, Secret};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "ANALYZER_BIND")]
    bind: Option<SocketAddr>,

    /// Offset commit hours are reported in, e.g. +05:30
    #[arg(long, env = "ANALYZER_UTC_OFFSET", allow_hyphen_values = true)]
    utc_offset: Option<UtcOffset>,

    /// Github API token
    #[arg(long, env = octocat::GITHUB_TOKEN_VAR, hide_env_values = true)]
    github_token: Option<String>,

    /// Largest commit window a request may ask for
    #[arg(long)]
    max_commit_limit: Option<u32>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    async fn config(&self) -> eyre::Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let document = tokio::fs::read_to_string(path)
                    .await
                    .wrap_err_with(|| format!("reading {}", path.display()))?;
                AnalyzerConfig::from_toml(&document)?
            }
            None => AnalyzerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind = bind;
        }
        if let Some(offset) = self.utc_offset {
            config.utc_offset = offset;
        }
        if let Some(limit) = self.max_commit_limit {
            config.max_commit_limit = limit;
        }
        if let Some(token) = self.github_token.as_deref().filter(|t| !t.trim().is_empty()) {
            config.github.token = Some(Secret::from(token.to_owned()));
        }

        Ok(config)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    let config = args.config().await?;
    let github = GithubClient::try_from(&config.github)?;

    let app = AnalyzerBuilder::new(Arc::new(github))
        .config(&config)
        .build();

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .wrap_err_with(|| format!("binding {}", config.bind))?;
    tracing::info!(
        "Github analyzer listening on http://{} (offset {})",
        config.bind,
        config.utc_offset
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

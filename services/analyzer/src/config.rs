//! Analyzer configuration.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use chrono::{FixedOffset, Offset as _, Utc};
use octocat::GithubConfig;
use serde::Deserialize;

/// Offset applied to commit timestamps when none is configured.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 5 * 60 + 30;

/// Largest commit window a single request may ask for by default.
pub const DEFAULT_MAX_COMMIT_LIMIT: u32 = 500;

/// Default listen address.
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);

/// The configured offset was not of the form `+HH:MM`.
#[derive(Debug, thiserror::Error)]
#[error("invalid UTC offset {0:?}: expected +HH:MM, -HH:MM or Z")]
pub struct UtcOffsetError(String);

/// A fixed offset from UTC used to bucket commits into local hours.
///
/// Parses `+05:30`, `-0800`, `+09`, `Z` and `UTC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct UtcOffset(FixedOffset);

impl UtcOffset {
    /// Offset from a signed number of minutes east of UTC.
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes * 60).map(UtcOffset)
    }

    /// UTC itself.
    pub fn utc() -> Self {
        UtcOffset(Utc.fix())
    }

    /// The offset as a chrono timezone.
    pub fn fixed(&self) -> FixedOffset {
        self.0
    }
}

impl Default for UtcOffset {
    fn default() -> Self {
        UtcOffset::from_minutes(DEFAULT_UTC_OFFSET_MINUTES).expect("default offset is in range")
    }
}

impl FromStr for UtcOffset {
    type Err = UtcOffsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.eq_ignore_ascii_case("z") || input.eq_ignore_ascii_case("utc") {
            return Ok(UtcOffset::utc());
        }

        // chrono wants minutes, so a bare `+HH` is widened to `+HH:00`
        let bare_hour = input.len() == 3
            && input.starts_with(['+', '-'])
            && input[1..].bytes().all(|b| b.is_ascii_digit());
        let parsed = if bare_hour {
            format!("{input}:00").parse::<FixedOffset>()
        } else {
            input.parse::<FixedOffset>()
        };

        parsed.map(UtcOffset).map_err(|_| UtcOffsetError(s.to_owned()))
    }
}

impl TryFrom<String> for UtcOffset {
    type Error = UtcOffsetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.0.local_minus_utc();
        let sign = if seconds < 0 { '-' } else { '+' };
        let minutes = seconds.abs() / 60;
        write!(f, "{sign}{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

/// Failed to load a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("invalid analyzer configuration: {0}")]
pub struct ConfigError(#[from] toml_edit::de::Error);

/// Settings for the analyzer service.
///
/// ```toml
/// bind = "0.0.0.0:8000"
/// utc_offset = "+05:30"
/// max_commit_limit = 500
///
/// [github]
/// token = "ghp_..."
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Address the HTTP server listens on
    pub bind: SocketAddr,

    /// Offset used to bucket commit times into local hours
    pub utc_offset: UtcOffset,

    /// Upper bound on the commit window a request may ask for
    pub max_commit_limit: u32,

    /// Github API access
    pub github: GithubConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND,
            utc_offset: UtcOffset::default(),
            max_commit_limit: DEFAULT_MAX_COMMIT_LIMIT,
            github: GithubConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Parse a TOML configuration document. Missing keys take their defaults.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        Ok(toml_edit::de::from_str(document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offset_is_india_standard_time() {
        assert_eq!(UtcOffset::default().to_string(), "+05:30");
        assert_eq!(UtcOffset::default().fixed().local_minus_utc(), 19800);
    }

    #[test]
    fn parse_offsets() {
        let cases = [
            ("+05:30", "+05:30"),
            ("-08:00", "-08:00"),
            ("+0945", "+09:45"),
            ("-03", "-03:00"),
            ("Z", "+00:00"),
            ("utc", "+00:00"),
        ];
        for (input, expected) in cases {
            let offset: UtcOffset = input.parse().unwrap();
            assert_eq!(offset.to_string(), expected, "parsing {input}");
        }
    }

    #[test]
    fn reject_bad_offsets() {
        for input in ["", "05:30", "+5:30", "+24:00", "+05:60", "+05:3", "+ab:cd", "+1"] {
            assert!(input.parse::<UtcOffset>().is_err(), "{input:?} should not parse");
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = AnalyzerConfig::from_toml("").unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.utc_offset, UtcOffset::default());
        assert_eq!(config.max_commit_limit, DEFAULT_MAX_COMMIT_LIMIT);
        assert!(config.github.token.is_none());
    }

    #[test]
    fn config_from_toml() {
        let config = AnalyzerConfig::from_toml(indoc::indoc! {r#"
            bind = "0.0.0.0:9000"
            utc_offset = "-05:00"
            max_commit_limit = 50

            [github]
            token = "ghp_example"
            api_base = "https://github.example.com/api/v3/"
        "#})
        .unwrap();

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.utc_offset.to_string(), "-05:00");
        assert_eq!(config.max_commit_limit, 50);
        assert!(!format!("{:?}", config.github).contains("ghp_example"));
        assert_eq!(config.github.token.unwrap().revealed(), "ghp_example");
    }

    #[test]
    fn config_rejects_unknown_keys() {
        assert!(AnalyzerConfig::from_toml("max_commits = 5").is_err());

        let misspelled = indoc::indoc! {r#"
            [github]
            tokn = "ghp_example"
        "#};
        assert!(AnalyzerConfig::from_toml(misspelled).is_err());
    }

    #[test]
    fn config_rejects_bad_offset() {
        assert!(AnalyzerConfig::from_toml("utc_offset = \"India\"").is_err());
    }
}

//! Checks GitHub for a newer release of the application.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;
use std::cmp::Ordering;
use std::time::Duration;
use thiserror::Error;

/// The version this build reports.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The GitHub API endpoint for the latest published release.
pub const UPDATE_URL: &str =
    "https://api.github.com/repos/darkstarworks/llm-coding-toolset/releases/latest";

/// Where the user is sent to download a newer version.
pub const RELEASES_PAGE_URL: &str = "https://github.com/darkstarworks/llm-coding-toolset/releases";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Any failure while asking for the latest version.
///
/// Displays as the underlying cause; [`UpdateCheckError::user_message`] wraps
/// it in the message shown to the user.
#[derive(Debug, Error)]
pub enum UpdateCheckError {
    /// Connection failures, timeouts and non-success HTTP statuses.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The body was not JSON or had no `tag_name`.
    #[error("{0}")]
    Malformed(#[from] serde_json::Error),
}

impl UpdateCheckError {
    pub const TITLE: &'static str = "Update Check Failed";

    pub fn user_message(&self) -> String {
        format!("Failed to check for updates: {self}")
    }
}

/// The outcome of a successful check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpdateAvailable { latest: String },
    UpToDate,
}

impl UpdateStatus {
    pub fn title(&self) -> &'static str {
        match self {
            UpdateStatus::UpdateAvailable { .. } => "Update Available",
            UpdateStatus::UpToDate => "No Updates",
        }
    }

    pub fn message(&self) -> String {
        match self {
            UpdateStatus::UpdateAvailable { latest } => format!(
                "A new version ({latest}) is available. Please visit the GitHub repository to download the latest version."
            ),
            UpdateStatus::UpToDate => "You are using the latest version.".to_string(),
        }
    }
}

/// A source of the latest published version tag.
#[async_trait]
pub trait VersionSource: Send + Sync {
    async fn fetch_latest_version(&self) -> Result<String, UpdateCheckError>;
}

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

/// Reads `tag_name` from a GitHub "latest release" endpoint.
pub struct GithubReleaseSource {
    client: reqwest::Client,
    url: String,
}

impl GithubReleaseSource {
    pub fn new(url: impl Into<String>) -> Result<Self, UpdateCheckError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl VersionSource for GithubReleaseSource {
    async fn fetch_latest_version(&self) -> Result<String, UpdateCheckError> {
        tracing::info!("Checking for updates at {}", self.url);
        let body = self
            .client
            .get(&self.url)
            // GitHub rejects API requests without a user agent.
            .header(USER_AGENT, concat!("llm-coding-toolset/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let release: Release = serde_json::from_str(&body)?;
        Ok(release.tag_name)
    }
}

/// Asks `source` for the latest version and compares it with `current`.
pub async fn check_for_updates<S: VersionSource + ?Sized>(
    source: &S,
    current: &str,
) -> Result<UpdateStatus, UpdateCheckError> {
    let latest = source.fetch_latest_version().await?;
    if is_newer(&latest, current) {
        tracing::info!("Update available: {} (running {})", latest, current);
        Ok(UpdateStatus::UpdateAvailable { latest })
    } else {
        tracing::info!("No update available (latest {}, running {})", latest, current);
        Ok(UpdateStatus::UpToDate)
    }
}

/// Whether release tag `latest` is newer than `current`.
///
/// Tags are compared as semantic versions (an optional leading `v` is
/// ignored), so `10.0.0` is newer than `2.0.0`. When either tag is not a valid
/// semantic version the tags are compared as plain strings.
pub fn is_newer(latest: &str, current: &str) -> bool {
    match (parse_version(latest), parse_version(current)) {
        (Some(latest), Some(current)) => latest > current,
        _ => latest.cmp(current) == Ordering::Greater,
    }
}

fn parse_version(tag: &str) -> Option<semver::Version> {
    let trimmed = tag.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    semver::Version::parse(trimmed).ok()
}

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ImageHost, RelayError};
use crate::config::GithubConfig;

/// Timeout for each call to the contents API.
pub const UPLOAD_TIMEOUT_SECS: u64 = 15;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Stores images in a GitHub repository through the contents API.
pub struct GithubHost {
    http: Client,
    config: GithubConfig,
}

#[derive(Deserialize)]
struct ContentsEntry {
    sha: String,
}

#[derive(Serialize)]
struct PutContents<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

impl GithubHost {
    pub fn new(config: GithubConfig) -> Result<Self, RelayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn contents_url(&self, name: &str) -> String {
        let base = self.config.api_url.trim_end_matches('/');
        let dir = self.config.images_dir.trim_matches('/');
        let name = urlencoding::encode(name);
        if dir.is_empty() {
            format!("{base}/repos/{}/contents/{name}", self.config.repo)
        } else {
            format!("{base}/repos/{}/contents/{dir}/{name}", self.config.repo)
        }
    }

    /// Revision of the file already stored at `url`, if any.
    async fn existing_sha(&self, url: &str) -> Result<Option<String>, RelayError> {
        let response = self
            .http
            .get(url)
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(&self.config.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let entry = response.error_for_status()?.json::<ContentsEntry>().await?;
        Ok(Some(entry.sha))
    }
}

#[async_trait]
impl ImageHost for GithubHost {
    async fn upsert(&self, name: &str, bytes: &[u8]) -> Result<(), RelayError> {
        let url = self.contents_url(name);
        let sha = self.existing_sha(&url).await?;
        let action = if sha.is_some() { "Updating" } else { "Creating" };
        debug!("[RELAY] {} {} ({} bytes)", action, url, bytes.len());

        let body = PutContents {
            message: format!("Upload {name} ({})", Utc::now().format("%Y-%m-%d %H:%M:%S")),
            content: STANDARD.encode(bytes),
            branch: &self.config.branch,
            sha,
        };
        self.http
            .put(&url)
            .bearer_auth(&self.config.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

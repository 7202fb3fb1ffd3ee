//! Image downloader.
//!
//! Fetches image bytes over HTTPS and writes them under the images
//! directory with a millisecond-timestamp prefix, so repeated runs never
//! collide. A small throttle runs after every download to avoid 429s from
//! the CDNs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::Result;

const USER_AGENT: &str = "trend-recs/0.1 (fashion trend PoC)";

/// Downloads images into a target directory.
pub struct Downloader {
    client: Client,
    out_dir: PathBuf,
    throttle: Duration,
}

impl Downloader {
    /// Create a downloader writing into `out_dir` (created on first use).
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            out_dir: out_dir.into(),
            throttle: Duration::from_millis(250),
        })
    }

    /// Configure the pause after each download (default: 250ms)
    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle = throttle;
        self
    }

    /// Fetch one image and write it to disk.
    ///
    /// Returns the path the image was written to. The file name is
    /// `{millis}_{sanitized basename}`, with a `.jpg` extension appended
    /// when the URL carries none.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.out_dir).await?;

        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        let name = file_name_for(url);
        let millis = chrono::Utc::now().timestamp_millis();
        let path = self.out_dir.join(format!("{millis}_{name}"));
        tokio::fs::write(&path, &bytes).await?;

        debug!(bytes = bytes.len(), path = %path.display(), "downloaded image");
        tokio::time::sleep(self.throttle).await;
        Ok(path)
    }

    /// Where this downloader writes images
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

/// Derive a safe file name from an image URL.
fn file_name_for(url: &str) -> String {
    let base = url
        .split('/')
        .next_back()
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("");
    let mut name = sanitize(base);
    if name.is_empty() {
        name = "img".to_string();
    }
    if !name.contains('.') {
        name.push_str(".jpg");
    }
    name
}

/// Keep only characters that are safe in a file name
fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}

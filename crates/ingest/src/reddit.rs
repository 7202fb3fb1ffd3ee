//! Read-only client for the public Reddit listing API.
//!
//! Fetches `/r/{subreddit}/new.json` and keeps only posts that point at a
//! direct image. Posts whose primary URL is not an image fall back to the
//! first preview source, which is usually a direct CDN link. No
//! authentication and no write capability.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{IngestError, Result};
use crate::types::{is_image_url, CollectedPost};
use catalog::Platform;
use chrono::{DateTime, Utc};

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
// Reddit requires a descriptive User-Agent; generic ones get rate-limited.
const USER_AGENT: &str = "trend-recs/0.1 (fashion trend PoC)";

/// Pause between listing requests, to stay well under rate limits
const LISTING_PACE: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: PostData,
}

#[derive(Debug, Default, Deserialize)]
struct PostData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_overridden_by_dest: Option<String>,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    preview: Option<Preview>,
}

#[derive(Debug, Default, Deserialize)]
struct Preview {
    #[serde(default)]
    images: Vec<PreviewImage>,
}

#[derive(Debug, Default, Deserialize)]
struct PreviewImage {
    #[serde(default)]
    source: Option<PreviewSource>,
}

#[derive(Debug, Default, Deserialize)]
struct PreviewSource {
    #[serde(default)]
    url: String,
}

impl PostData {
    /// Best direct image URL for this post, if any.
    ///
    /// Prefers the resolved destination URL, then the raw URL, then the
    /// first preview source (whose URL arrives HTML-escaped).
    fn image_url(&self) -> Option<String> {
        for candidate in [&self.url_overridden_by_dest, &self.url] {
            if let Some(u) = candidate {
                if is_image_url(u) {
                    return Some(u.clone());
                }
            }
        }
        let preview = self
            .preview
            .as_ref()?
            .images
            .first()?
            .source
            .as_ref()?
            .url
            .replace("&amp;", "&");
        if preview.is_empty() {
            None
        } else {
            Some(preview)
        }
    }
}

/// Client for the public Reddit listing endpoints.
pub struct RedditClient {
    client: Client,
    base_url: Url,
}

impl RedditClient {
    /// Creates a client pointed at reddit.com.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| IngestError::Api(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Fetch the newest image posts of a subreddit.
    ///
    /// Posts without a usable image URL are skipped silently; a throttle
    /// runs after the request so callers can loop over subreddits politely.
    #[instrument(skip(self))]
    pub async fn fetch_new(&self, subreddit: &str, limit: u32) -> Result<Vec<CollectedPost>> {
        let url = self
            .base_url
            .join(&format!("r/{subreddit}/new.json"))
            .map_err(|e| IngestError::Api(format!("invalid subreddit '{subreddit}': {e}")))?;

        let response = self
            .client
            .get(url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let listing: Listing = serde_json::from_str(&body).map_err(|e| IngestError::Decode {
            context: format!("r/{subreddit} listing"),
            source: e,
        })?;

        let mut posts = Vec::new();
        for child in listing.data.children {
            let data = child.data;
            let Some(image_url) = data.image_url() else {
                debug!(post = %data.id, "no direct image, skipping");
                continue;
            };
            let created_at = DateTime::<Utc>::from_timestamp(data.created_utc as i64, 0)
                .unwrap_or_else(|| {
                    warn!(post = %data.id, "bad created_utc, using now");
                    Utc::now()
                });
            posts.push(CollectedPost {
                platform: Platform::Reddit,
                origin_id: data.id,
                board: subreddit.to_string(),
                url: image_url,
                title: data.title,
                description: String::new(),
                created_at,
            });
        }

        debug!(count = posts.len(), "collected image posts");
        tokio::time::sleep(LISTING_PACE).await;
        Ok(posts)
    }

    /// Fetch several subreddits, skipping any that fail.
    ///
    /// A 4xx/5xx or malformed response on one subreddit is logged and the
    /// run continues with the next; only successful sources appear in the
    /// result.
    #[instrument(skip(self, subreddits))]
    pub async fn fetch_new_all(
        &self,
        subreddits: &[String],
        limit: u32,
    ) -> Vec<(String, Vec<CollectedPost>)> {
        let mut results = Vec::with_capacity(subreddits.len());
        for subreddit in subreddits {
            match self.fetch_new(subreddit, limit).await {
                Ok(posts) => results.push((subreddit.clone(), posts)),
                Err(e) => warn!("Skipping r/{}: {}", subreddit, e),
            }
        }
        results
    }
}

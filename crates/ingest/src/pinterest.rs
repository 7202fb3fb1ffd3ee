//! Read-only client for the Pinterest v5 API.
//!
//! Covers the endpoints the collector needs: listing boards you own or
//! collaborate on, listing pins on a board (both paginated via bookmarks),
//! and minting a fresh access token from a refresh token. Image URL
//! extraction prefers the original rendition and skips video pins.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::error::{IngestError, Result};
use crate::types::CollectedPost;
use catalog::Platform;
use chrono::{DateTime, Utc};

pub const DEFAULT_BASE_URL: &str = "https://api.pinterest.com/v5";
const USER_AGENT: &str = "trend-recs/0.1 (fashion trend PoC)";

/// Pause between paginated requests
const PAGE_PACE: Duration = Duration::from_millis(200);

/// Renditions to try, best first
const IMAGE_KEYS: [&str; 5] = ["original", "orig", "xlarge", "large", "1200x"];

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    bookmark: Option<String>,
}

/// A board the token's account owns or collaborates on
#[derive(Debug, Clone, Deserialize)]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub privacy: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pin {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub images: HashMap<String, MediaImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Pin {
    /// Best image URL for this pin, or None for videos / imageless pins
    pub fn image_url(&self) -> Option<String> {
        let media = self.media.as_ref()?;
        if media
            .media_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("video"))
        {
            return None;
        }
        for key in IMAGE_KEYS {
            if let Some(image) = media.images.get(key) {
                return Some(image.url.clone());
            }
        }
        None
    }
}

impl Board {
    /// Crude relevance heuristic over the board name and description.
    ///
    /// Counts how many menswear-ish keywords appear, so the CLI can rank
    /// boards when the user doesn't name them explicitly.
    pub fn relevance(&self) -> f32 {
        const KEYWORDS: [&str; 11] = [
            "men",
            "mens",
            "menswear",
            "streetwear",
            "outfit",
            "outfits",
            "style",
            "fashion",
            "wardrobe",
            "formal",
            "casual",
        ];
        let text = format!("{} {}", self.name, self.description).to_lowercase();
        KEYWORDS
            .iter()
            .filter(|k| text.split(|c: char| !c.is_alphanumeric()).any(|w| w == **k))
            .count() as f32
    }
}

/// Client for the Pinterest v5 REST API.
pub struct PinterestClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl PinterestClient {
    /// Creates a client pointed at the production API.
    pub fn new(token: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        token: impl Into<String>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| IngestError::Api(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// Mint a fresh access token from a refresh token (OAuth refresh grant).
    pub async fn refresh_access_token(
        app_id: &str,
        app_secret: &str,
        refresh_token: &str,
        base_url: &str,
    ) -> Result<String> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let url = format!("{}/oauth/token", base_url.trim_end_matches('/'));
        let response = client
            .post(url)
            .basic_auth(app_id, Some(app_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?
            .error_for_status()?;
        let body = response.text().await?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| IngestError::Decode {
                context: "token response".to_string(),
                source: e,
            })?;
        Ok(token.access_token)
    }

    /// List boards the token's account owns or collaborates on.
    ///
    /// Follows bookmark pagination to the end; `privacy` filters to
    /// PUBLIC | PROTECTED | SECRET when set.
    #[instrument(skip(self))]
    pub async fn list_boards(&self, privacy: Option<&str>) -> Result<Vec<Board>> {
        let url = self.endpoint("boards")?;
        let mut boards = Vec::new();
        let mut bookmark: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(url.clone())
                .bearer_auth(&self.token)
                .query(&[("page_size", "50")]);
            if let Some(bm) = &bookmark {
                request = request.query(&[("bookmark", bm.as_str())]);
            }
            if let Some(p) = privacy {
                request = request.query(&[("privacy", p)]);
            }
            let page: Page<Board> = Self::fetch_page(request, "boards page").await?;
            let empty = page.items.is_empty();
            boards.extend(page.items);
            bookmark = page.bookmark.filter(|b| !b.is_empty());
            if bookmark.is_none() || empty {
                break;
            }
            tokio::time::sleep(PAGE_PACE).await;
        }
        debug!(count = boards.len(), "listed boards");
        Ok(boards)
    }

    /// List pins on a board, up to `limit`.
    #[instrument(skip(self))]
    pub async fn list_pins(&self, board_id: &str, limit: usize) -> Result<Vec<Pin>> {
        let url = self.endpoint(&format!("boards/{board_id}/pins"))?;
        let mut pins = Vec::new();
        let mut bookmark: Option<String> = None;
        loop {
            let mut request = self
                .client
                .get(url.clone())
                .bearer_auth(&self.token)
                .query(&[("page_size", "100")]);
            if let Some(bm) = &bookmark {
                request = request.query(&[("bookmark", bm.as_str())]);
            }
            let page: Page<Pin> = Self::fetch_page(request, "pins page").await?;
            let empty = page.items.is_empty();
            pins.extend(page.items);
            if pins.len() >= limit {
                pins.truncate(limit);
                break;
            }
            bookmark = page.bookmark.filter(|b| !b.is_empty());
            if bookmark.is_none() || empty {
                break;
            }
            tokio::time::sleep(PAGE_PACE).await;
        }
        debug!(count = pins.len(), "listed pins");
        Ok(pins)
    }

    /// List pins for several boards, skipping any board that fails.
    ///
    /// An error on one board (revoked access, deleted board, rate limit)
    /// is logged and the run continues with the next board.
    #[instrument(skip(self, boards))]
    pub async fn list_pins_all(
        &self,
        boards: &[Board],
        limit: usize,
    ) -> Vec<(Board, Vec<Pin>)> {
        let mut results = Vec::with_capacity(boards.len());
        for board in boards {
            match self.list_pins(&board.id, limit).await {
                Ok(pins) => results.push((board.clone(), pins)),
                Err(e) => warn!("Skipping board {}: {}", board.name, e),
            }
        }
        results
    }

    /// Send a paginated request and decode one page of results
    async fn fetch_page<T: DeserializeOwned>(request: RequestBuilder, context: &str) -> Result<Page<T>> {
        let body = request.send().await?.error_for_status()?.text().await?;
        serde_json::from_str(&body).map_err(|e| IngestError::Decode {
            context: context.to_string(),
            source: e,
        })
    }

    /// Resolve board names or ids to boards (names case-insensitive)
    pub fn find_boards(boards: &[Board], names_or_ids: &[String]) -> Vec<Board> {
        let wanted: Vec<String> = names_or_ids
            .iter()
            .map(|n| n.trim().to_lowercase())
            .collect();
        boards
            .iter()
            .filter(|b| {
                wanted.contains(&b.id.to_lowercase()) || wanted.contains(&b.name.to_lowercase())
            })
            .cloned()
            .collect()
    }

    /// Turn a pin into a collected post, if it carries a usable image
    pub fn pin_to_post(pin: &Pin, board_name: &str) -> Option<CollectedPost> {
        let url = pin.image_url()?;
        let created_at = pin
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        Some(CollectedPost {
            platform: Platform::Pinterest,
            origin_id: pin.id.clone(),
            board: board_name.to_string(),
            url,
            title: pin.title.clone(),
            description: pin.description.clone(),
            created_at,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| IngestError::Api(format!("invalid endpoint '{path}': {e}")))
    }
}

//! Types shared by the ingestion clients.

use catalog::{Platform, SourceItem};
use chrono::{DateTime, Utc};

/// An image post found on a platform, before download.
///
/// Becomes a [`SourceItem`] once the image has been fetched to disk.
#[derive(Debug, Clone)]
pub struct CollectedPost {
    pub platform: Platform,
    /// Platform-native id (Reddit post id or Pinterest pin id)
    pub origin_id: String,
    /// Subreddit or board name
    pub board: String,
    /// Direct image URL
    pub url: String,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl CollectedPost {
    /// Pair the post with its downloaded image path
    pub fn into_source_item(self, local_path: String) -> SourceItem {
        SourceItem {
            platform: self.platform,
            origin_id: self.origin_id,
            board: self.board,
            url: self.url,
            local_path,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

/// Returns true if the URL points at a direct image file.
///
/// The query string is ignored, matching how CDN links carry sizing params.
pub fn is_image_url(url: &str) -> bool {
    let path = url.to_lowercase();
    let path = path.split('?').next().unwrap_or("");
    [".jpg", ".jpeg", ".png", ".webp"]
        .iter()
        .any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_url() {
        assert!(is_image_url("https://i.redd.it/abc.jpg"));
        assert!(is_image_url("https://i.redd.it/abc.PNG"));
        assert!(is_image_url("https://cdn.example.com/x.webp?width=640&s=abc"));
        assert!(!is_image_url("https://v.redd.it/clip.mp4"));
        assert!(!is_image_url("https://www.reddit.com/gallery/abc"));
    }
}

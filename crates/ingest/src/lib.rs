//! # Ingest Crate
//!
//! This crate implements the ingestion collector: read-only clients that
//! pull image posts and their metadata from user-authorized sources.
//!
//! ## Components
//!
//! ### Reddit (public listing API)
//! Fetches `/r/{sub}/new.json` and keeps direct image posts, with a
//! preview-source fallback for link posts.
//!
//! ### Pinterest (v5 API)
//! Lists boards and pins for the authorized account (bookmark pagination),
//! refreshes access tokens, and extracts the best image rendition.
//!
//! ### Downloader
//! Fetches image bytes to the images directory with polite throttling.
//!
//! Collected posts become [`catalog::SourceItem`] rows appended to the
//! metadata log. There is no write/posting capability anywhere in this
//! crate, and tokens only ever come from the environment.

// Public modules
pub mod download;
pub mod error;
pub mod pinterest;
pub mod reddit;
pub mod types;

// Re-export commonly used types
pub use download::Downloader;
pub use error::{IngestError, Result};
pub use pinterest::{Board, Pin, PinterestClient};
pub use reddit::RedditClient;
pub use types::{is_image_url, CollectedPost};

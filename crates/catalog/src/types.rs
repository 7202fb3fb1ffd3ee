//! Core domain types for the fashion catalog.
//!
//! This module defines the fundamental data structures used throughout the
//! system: source items pulled from Reddit/Pinterest, the embedding records
//! derived from them, and the in-memory index that the rest of the pipeline
//! queries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a catalog item.
///
/// Item ids are positional: an item's id is its zero-based position in the
/// append-only metadata log, which is also its row in the vector index.
pub type ItemId = u64;

// =============================================================================
// Source Items
// =============================================================================

/// Platform an item was collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    Pinterest,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Reddit => write!(f, "reddit"),
            Platform::Pinterest => write!(f, "pinterest"),
        }
    }
}

/// An image plus its metadata, as collected by the ingestion clients.
///
/// Immutable once ingested. The item id is not stored in the record itself;
/// it is assigned from the item's position in the metadata log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceItem {
    pub platform: Platform,
    /// Platform-native id (Reddit post id or Pinterest pin id)
    pub origin_id: String,
    /// Subreddit or board the item came from
    pub board: String,
    /// Original image URL
    pub url: String,
    /// Where the downloaded image lives on disk
    pub local_path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Styles
// =============================================================================

/// Style categories assigned by zero-shot tagging.
///
/// These are the six categories the tagger scores every image against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    #[serde(rename = "streetwear")]
    Streetwear,
    #[serde(rename = "formal")]
    Formal,
    #[serde(rename = "business casual")]
    BusinessCasual,
    #[serde(rename = "vintage")]
    Vintage,
    #[serde(rename = "minimalist")]
    Minimalist,
    #[serde(rename = "grunge")]
    Grunge,
}

impl Style {
    /// All styles, in tagger order
    pub const ALL: [Style; 6] = [
        Style::Streetwear,
        Style::Formal,
        Style::BusinessCasual,
        Style::Vintage,
        Style::Minimalist,
        Style::Grunge,
    ];

    /// Human-readable label, matching the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Style::Streetwear => "streetwear",
            Style::Formal => "formal",
            Style::BusinessCasual => "business casual",
            Style::Vintage => "vintage",
            Style::Minimalist => "minimalist",
            Style::Grunge => "grunge",
        }
    }

    /// Text prompt used for zero-shot tagging of this style
    pub fn prompt(&self) -> String {
        format!("a photo of {} menswear outfit", self.label())
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "streetwear" => Ok(Style::Streetwear),
            "formal" => Ok(Style::Formal),
            "business casual" | "business-casual" => Ok(Style::BusinessCasual),
            "vintage" => Ok(Style::Vintage),
            "minimalist" => Ok(Style::Minimalist),
            "grunge" => Ok(Style::Grunge),
            other => Err(format!("unknown style: {}", other)),
        }
    }
}

// =============================================================================
// Embedding Records
// =============================================================================

/// A fixed-length vector derived from a source item, plus its style tag.
///
/// Derived data: the vector is not reversible into the source image. All
/// stored vectors are unit-normalized so that inner product equals cosine
/// similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub item_id: ItemId,
    pub vector: Vec<f32>,
    pub style: Style,
    /// Tagger softmax probability for the assigned style, in [0, 1]
    pub confidence: f32,
}

// =============================================================================
// Statistics
// =============================================================================

/// Precomputed per-style statistics
///
/// These are computed once when loading the catalog for fast lookups later
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StyleStats {
    pub item_count: u32,
    pub avg_confidence: f32,
}

// =============================================================================
// CatalogIndex - The Core In-Memory Database
// =============================================================================

/// Main data structure holding all items, embeddings, and indices.
///
/// This is the heart of the catalog crate. It provides O(1) lookups for
/// items and embedding records, plus secondary indices by style and by day
/// for the trend tracker and the candidate sources.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    // Primary data stores
    pub(crate) items: HashMap<ItemId, SourceItem>,
    pub(crate) embeddings: HashMap<ItemId, EmbeddingRecord>,

    // Secondary indices for specialized queries
    /// Items grouped by assigned style
    pub(crate) style_index: HashMap<Style, Vec<ItemId>>,
    /// Items grouped by ingestion day (sorted by day)
    pub(crate) day_index: BTreeMap<NaiveDate, Vec<ItemId>>,

    // Precomputed statistics
    pub(crate) style_stats: HashMap<Style, StyleStats>,

    /// Next positional id to hand out
    pub(crate) next_id: ItemId,
}

impl CatalogIndex {
    /// Creates a new, empty CatalogIndex
    pub fn new() -> Self {
        Self::default()
    }

    // Getters - these return references, not owned values

    /// Get an item by id
    pub fn get_item(&self, id: ItemId) -> Option<&SourceItem> {
        self.items.get(&id)
    }

    /// Get the embedding record for an item
    pub fn get_embedding(&self, id: ItemId) -> Option<&EmbeddingRecord> {
        self.embeddings.get(&id)
    }

    /// Get all items tagged with a specific style
    ///
    /// Returns an empty slice if no items carry the style
    pub fn get_items_by_style(&self, style: Style) -> &[ItemId] {
        self.style_index
            .get(&style)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all items created on a specific day
    pub fn get_items_by_day(&self, day: NaiveDate) -> &[ItemId] {
        self.day_index
            .get(&day)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate (day, item ids) in ascending day order
    pub fn days(&self) -> impl DoubleEndedIterator<Item = (NaiveDate, &[ItemId])> {
        self.day_index.iter().map(|(day, ids)| (*day, ids.as_slice()))
    }

    /// Iterate all embedding records (arbitrary order)
    pub fn embeddings(&self) -> impl Iterator<Item = &EmbeddingRecord> {
        self.embeddings.values()
    }

    /// Get precomputed statistics for a style
    pub fn get_style_stats(&self, style: Style) -> Option<&StyleStats> {
        self.style_stats.get(&style)
    }

    /// Get all item ids currently in the catalog
    pub fn all_item_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.items.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // Mutators - used during catalog loading

    /// Insert an item, assigning the next positional id
    pub fn insert_item(&mut self, item: SourceItem) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(id, item);
        id
    }

    /// Insert an embedding record and update the style/day indices
    pub fn insert_embedding(&mut self, record: EmbeddingRecord) {
        let item_id = record.item_id;
        self.style_index
            .entry(record.style)
            .or_default()
            .push(item_id);
        if let Some(item) = self.items.get(&item_id) {
            self.day_index
                .entry(item.created_at.date_naive())
                .or_default()
                .push(item_id);
        }
        self.embeddings.insert(item_id, record);
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize) {
        (self.items.len(), self.embeddings.len())
    }
}

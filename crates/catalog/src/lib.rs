//! # Catalog Crate
//!
//! This crate owns the on-disk catalog and the in-memory index the rest of
//! the recommendation pipeline queries.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (SourceItem, EmbeddingRecord, Style, CatalogIndex)
//! - **parser**: Read/append the JSONL metadata and embedding logs
//! - **index**: Build the index, secondary lookups, and per-style stats
//! - **error**: Error types for catalog loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::CatalogIndex;
//! use std::path::Path;
//!
//! // Load the whole catalog
//! let index = CatalogIndex::load_from_files(Path::new("data"))?;
//!
//! // Query data
//! let item = index.get_item(0).unwrap();
//! let record = index.get_embedding(0).unwrap();
//! println!("{} tagged {} ({:.2})", item.url, record.style, record.confidence);
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use index::{CATALOG_FILE, META_FILE};
pub use types::{
    // Type aliases
    ItemId,
    // Core types
    SourceItem,
    EmbeddingRecord,
    CatalogIndex,
    StyleStats,
    // Enums
    Platform,
    Style,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_catalog_index_creation() {
        let index = CatalogIndex::new();
        let (items, embeddings) = index.counts();

        assert_eq!(items, 0);
        assert_eq!(embeddings, 0);
    }

    #[test]
    fn test_insert_item() {
        let mut index = CatalogIndex::new();

        let item = SourceItem {
            platform: Platform::Pinterest,
            origin_id: "99887".to_string(),
            board: "Fall fits".to_string(),
            url: "https://i.pinimg.com/originals/x.jpg".to_string(),
            local_path: "data/pinterest_images/99887.jpg".to_string(),
            title: "Layered look".to_string(),
            description: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 8, 20, 9, 30, 0).unwrap(),
        };

        let id = index.insert_item(item);

        let retrieved = index.get_item(id).unwrap();
        assert_eq!(retrieved.origin_id, "99887");
        assert_eq!(retrieved.platform, Platform::Pinterest);
    }

    #[test]
    fn test_empty_queries() {
        let index = CatalogIndex::new();

        // Querying non-existent data should return None or empty slices
        assert!(index.get_item(999).is_none());
        assert!(index.get_embedding(999).is_none());
        assert!(index.get_items_by_style(Style::Grunge).is_empty());
        assert!(index.all_item_ids().is_empty());
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("streetwear".parse::<Style>().unwrap(), Style::Streetwear);
        assert_eq!(
            "Business Casual".parse::<Style>().unwrap(),
            Style::BusinessCasual
        );
        assert!("cottagecore".parse::<Style>().is_err());
    }
}

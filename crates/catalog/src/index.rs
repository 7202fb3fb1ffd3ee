//! CatalogIndex building and validation.
//!
//! This module builds the CatalogIndex from the on-disk logs:
//! - Parse `meta.jsonl` and `catalog.jsonl` in parallel
//! - Assign positional item ids
//! - Build secondary indices (style, day)
//! - Compute per-style statistics

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// File name of the item metadata log inside a data directory
pub const META_FILE: &str = "meta.jsonl";
/// File name of the embedding log inside a data directory
pub const CATALOG_FILE: &str = "catalog.jsonl";

impl CatalogIndex {
    /// Load the catalog from a data directory.
    ///
    /// This is the main entry point for loading data. Missing files load as
    /// empty, so a catalog that has been ingested but not yet embedded still
    /// loads (with zero embedding records).
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let meta_path = data_dir.join(META_FILE);
        let catalog_path = data_dir.join(CATALOG_FILE);

        // Parse both logs in parallel using rayon::join
        let (items, embeddings) = rayon::join(
            || parser::parse_items(&meta_path),
            || parser::parse_embeddings(&catalog_path),
        );
        let items = items?;
        let embeddings = embeddings?;

        info!(
            items = items.len(),
            embeddings = embeddings.len(),
            "loaded catalog logs from {}",
            data_dir.display()
        );

        let mut index = CatalogIndex::new();
        for item in items {
            index.insert_item(item);
        }
        for record in embeddings {
            index.insert_embedding(record);
        }

        index.compute_style_stats();
        index.validate()?;

        Ok(index)
    }

    /// Compute per-style statistics from the embedding records.
    ///
    /// Runs one rayon task per style; each task scans only that style's
    /// item ids.
    pub fn compute_style_stats(&mut self) {
        let stats: HashMap<Style, StyleStats> = self
            .style_index
            .par_iter()
            .map(|(style, ids)| {
                let mut sum = 0.0f32;
                let mut count = 0u32;
                for id in ids {
                    if let Some(record) = self.embeddings.get(id) {
                        sum += record.confidence;
                        count += 1;
                    }
                }
                let avg = if count > 0 { sum / count as f32 } else { 0.0 };
                (
                    *style,
                    StyleStats {
                        item_count: count,
                        avg_confidence: avg,
                    },
                )
            })
            .collect();
        self.style_stats = stats;
    }

    /// Validate referential integrity of the loaded catalog.
    ///
    /// - every embedding record must reference a known item
    /// - all vectors must share one dimension, and be non-empty
    /// - confidences must lie in [0, 1]
    pub fn validate(&self) -> Result<()> {
        let mut dim: Option<usize> = None;
        for record in self.embeddings.values() {
            if !self.items.contains_key(&record.item_id) {
                return Err(CatalogError::MissingReference {
                    entity: "item".to_string(),
                    id: record.item_id,
                });
            }
            if record.vector.is_empty() {
                return Err(CatalogError::ValidationError(format!(
                    "empty embedding vector for item {}",
                    record.item_id
                )));
            }
            match dim {
                None => dim = Some(record.vector.len()),
                Some(expected) if expected != record.vector.len() => {
                    return Err(CatalogError::DimensionMismatch {
                        expected,
                        found: record.vector.len(),
                        item_id: record.item_id,
                    });
                }
                _ => {}
            }
            if !(0.0..=1.0).contains(&record.confidence) {
                return Err(CatalogError::InvalidValue {
                    field: "confidence".to_string(),
                    value: record.confidence.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Embedding dimension of the catalog, if any records are loaded
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.values().next().map(|r| r.vector.len())
    }
}

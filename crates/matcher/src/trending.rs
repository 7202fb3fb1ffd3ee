//! Trending source - cold-start candidate generation.
//!
//! Serves requests that carry no reference photo: walks the catalog's
//! day buckets newest-first and proposes recent items from the styles
//! with the highest current velocity. Base score blends the style's
//! velocity with the tagger's confidence so a confidently-tagged item
//! from a hot style outranks a marginal one.

use crate::types::{Candidate, CandidateSource, UserProfile};
use catalog::{CatalogIndex, Style};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// How many of the most recent day buckets to draw from
const DEFAULT_DAY_WINDOW: usize = 14;

/// Generates candidates from recent items in high-velocity styles.
#[derive(Clone)]
pub struct TrendingSource {
    catalog: Arc<CatalogIndex>,
    velocities: HashMap<Style, f32>,
    day_window: usize,
}

impl TrendingSource {
    /// Build the source from the catalog and the latest per-style velocities.
    pub fn new(catalog: Arc<CatalogIndex>, velocities: HashMap<Style, f32>) -> Self {
        Self {
            catalog,
            velocities,
            day_window: DEFAULT_DAY_WINDOW,
        }
    }

    /// Configure how many recent day buckets to consider (default: 14)
    pub fn with_day_window(mut self, days: usize) -> Self {
        self.day_window = days.max(1);
        self
    }

    /// Generate trending candidates.
    ///
    /// The profile's style allowlist is not applied here; that is the
    /// filter pipeline's job. Items are scored velocity-first and
    /// returned best-first, capped at an oversized pool like the
    /// similarity source.
    #[instrument(skip(self, _profile))]
    pub fn get_candidates(&self, _profile: &UserProfile, limit: usize) -> Vec<Candidate> {
        let recent_days: Vec<_> = self.catalog.days().rev().take(self.day_window).collect();

        let mut candidates = Vec::new();
        for (_day, item_ids) in recent_days {
            for &item_id in item_ids {
                let Some(record) = self.catalog.get_embedding(item_id) else {
                    continue;
                };
                let velocity = self
                    .velocities
                    .get(&record.style)
                    .copied()
                    .unwrap_or(0.0);
                let base_score = velocity.max(0.0) + record.confidence;
                let mut candidate = Candidate::new(
                    item_id,
                    CandidateSource::Trending,
                    base_score,
                    record.style,
                    record.confidence,
                );
                candidate.metadata.velocity = Some(velocity);
                candidates.push(candidate);
            }
        }

        candidates.sort_unstable_by(|a, b| {
            b.base_score
                .partial_cmp(&a.base_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(limit * 5);

        debug!(count = candidates.len(), "generated trending candidates");
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{EmbeddingRecord, Platform, SourceItem};
    use chrono::{TimeZone, Utc};

    fn insert(index: &mut CatalogIndex, style: Style, confidence: f32, day: u32) {
        let id = index.insert_item(SourceItem {
            platform: Platform::Pinterest,
            origin_id: format!("pin-{}", index.counts().0),
            board: "fits".to_string(),
            url: String::new(),
            local_path: String::new(),
            title: String::new(),
            description: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
        });
        index.insert_embedding(EmbeddingRecord {
            item_id: id,
            vector: vec![1.0, 0.0],
            style,
            confidence,
        });
    }

    #[test]
    fn test_hot_style_ranks_first() {
        let mut index = CatalogIndex::new();
        insert(&mut index, Style::Streetwear, 0.6, 10);
        insert(&mut index, Style::Formal, 0.6, 10);

        let velocities = HashMap::from([(Style::Streetwear, 2.0), (Style::Formal, 0.1)]);
        let source = TrendingSource::new(Arc::new(index), velocities);

        let candidates = source.get_candidates(&UserProfile::new(), 5);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].style, Style::Streetwear);
        assert_eq!(candidates[0].source, CandidateSource::Trending);
        assert_eq!(candidates[0].metadata.velocity, Some(2.0));
    }

    #[test]
    fn test_negative_velocity_does_not_subtract() {
        let mut index = CatalogIndex::new();
        insert(&mut index, Style::Grunge, 0.7, 10);

        let velocities = HashMap::from([(Style::Grunge, -3.0)]);
        let source = TrendingSource::new(Arc::new(index), velocities);

        let candidates = source.get_candidates(&UserProfile::new(), 5);
        assert!((candidates[0].base_score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_day_window_excludes_old_items() {
        let mut index = CatalogIndex::new();
        insert(&mut index, Style::Vintage, 0.9, 1);
        insert(&mut index, Style::Vintage, 0.9, 20);

        let source = TrendingSource::new(Arc::new(index), HashMap::new()).with_day_window(1);
        let candidates = source.get_candidates(&UserProfile::new(), 5);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].item_id, 1);
    }

    #[test]
    fn test_empty_catalog() {
        let source = TrendingSource::new(Arc::new(CatalogIndex::new()), HashMap::new());
        assert!(source.get_candidates(&UserProfile::new(), 5).is_empty());
    }
}

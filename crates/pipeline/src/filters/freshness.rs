//! Optional filter for recency.
//!
//! Trend-driven recommendations lose value when the underlying item is
//! stale, so this filter drops candidates whose source post is older
//! than a configurable window. The window is anchored to the newest
//! item in the catalog rather than the wall clock, so a catalog that
//! has not been refreshed for a while still returns results.

use crate::traits::Filter;
use anyhow::Result;
use catalog::CatalogIndex;
use chrono::{Duration, NaiveDate};
use matcher::{Candidate, UserProfile};
use std::sync::Arc;

/// Filters candidates whose source post is too old.
pub struct FreshnessFilter {
    catalog: Arc<CatalogIndex>,
    max_age_days: i64,
}

impl FreshnessFilter {
    /// Create a new FreshnessFilter.
    ///
    /// # Arguments
    /// * `catalog` - Shared reference to the catalog for item lookups
    /// * `max_age_days` - Keep items at most this many days older than
    ///   the newest catalog item (typically 30)
    pub fn new(catalog: Arc<CatalogIndex>, max_age_days: i64) -> Self {
        Self {
            catalog,
            max_age_days,
        }
    }

    fn cutoff(&self) -> Option<NaiveDate> {
        let newest = self.catalog.days().next_back()?.0;
        Some(newest - Duration::days(self.max_age_days))
    }
}

impl Filter for FreshnessFilter {
    fn name(&self) -> &str {
        "FreshnessFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _profile: &UserProfile) -> Result<Vec<Candidate>> {
        let Some(cutoff) = self.cutoff() else {
            return Ok(candidates);
        };
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                if let Some(item) = self.catalog.get_item(candidate.item_id) {
                    item.created_at.date_naive() >= cutoff
                } else {
                    false
                }
            })
            .collect();

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{EmbeddingRecord, Platform, SourceItem, Style};
    use chrono::{TimeZone, Utc};
    use matcher::CandidateSource;

    fn catalog_with_days(days: &[u32]) -> CatalogIndex {
        let mut index = CatalogIndex::new();
        for (i, day) in days.iter().enumerate() {
            let id = index.insert_item(SourceItem {
                platform: Platform::Reddit,
                origin_id: format!("item{i}"),
                board: "streetwear".to_string(),
                url: String::new(),
                local_path: String::new(),
                title: String::new(),
                description: String::new(),
                created_at: Utc.with_ymd_and_hms(2026, 8, *day, 12, 0, 0).unwrap(),
            });
            index.insert_embedding(EmbeddingRecord {
                item_id: id,
                vector: vec![1.0],
                style: Style::Streetwear,
                confidence: 0.8,
            });
        }
        index
    }

    #[test]
    fn test_freshness_filter_drops_stale_items() {
        // Newest item is Aug 28; a 7 day window cuts off Aug 21
        let catalog = Arc::new(catalog_with_days(&[1, 25, 28]));

        let candidates = vec![
            Candidate::new(0, CandidateSource::Similarity, 0.9, Style::Streetwear, 0.8),
            Candidate::new(1, CandidateSource::Similarity, 0.8, Style::Streetwear, 0.8),
            Candidate::new(2, CandidateSource::Trending, 0.7, Style::Streetwear, 0.8),
        ];

        let filter = FreshnessFilter::new(catalog, 7);
        let filtered = filter.apply(candidates, &UserProfile::new()).unwrap();

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].item_id, 1);
        assert_eq!(filtered[1].item_id, 2);
    }

    #[test]
    fn test_freshness_filter_empty_catalog_keeps_all() {
        let catalog = Arc::new(CatalogIndex::new());
        let candidates = vec![Candidate::new(
            0,
            CandidateSource::Similarity,
            0.9,
            Style::Streetwear,
            0.8,
        )];

        let filter = FreshnessFilter::new(catalog, 7);
        assert_eq!(filter.apply(candidates, &UserProfile::new()).unwrap().len(), 1);
    }
}

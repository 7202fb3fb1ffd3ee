//! Trend signal computation.
//!
//! Buckets tagged items per (style, day), smooths the daily counts with an
//! EMA, and takes the first difference as the trend velocity. Only days
//! that actually saw items participate; gap days are not reindexed to zero.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::ema::{diff, ema};
use catalog::{CatalogIndex, Style};

/// Default EMA span in days
pub const DEFAULT_SPAN: u32 = 5;

/// One (style, day) bucket of the trend signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub style: Style,
    pub day: NaiveDate,
    /// Items tagged with this style on this day
    pub count: u32,
    /// EMA-smoothed daily count
    pub ema: f32,
    /// First difference of the EMA; 0.0 on a style's first day
    pub velocity: f32,
}

/// The full trend signal over the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendReport {
    pub span: u32,
    pub points: Vec<TrendPoint>,
}

impl TrendReport {
    /// Compute the trend signal from a loaded catalog.
    #[instrument(skip(index))]
    pub fn compute(index: &CatalogIndex, span: u32) -> Self {
        // Bucket counts per (style, day); BTreeMap keeps days sorted.
        let mut buckets: HashMap<Style, BTreeMap<NaiveDate, u32>> = HashMap::new();
        for record in index.embeddings() {
            let Some(item) = index.get_item(record.item_id) else {
                continue;
            };
            *buckets
                .entry(record.style)
                .or_default()
                .entry(item.created_at.date_naive())
                .or_insert(0) += 1;
        }

        let mut points = Vec::new();
        for (style, days) in buckets {
            let (dates, counts): (Vec<NaiveDate>, Vec<u32>) = days.into_iter().unzip();
            let counts_f: Vec<f32> = counts.iter().map(|&c| c as f32).collect();
            let smoothed = ema(&counts_f, span);
            let velocities = diff(&smoothed);
            for i in 0..dates.len() {
                points.push(TrendPoint {
                    style,
                    day: dates[i],
                    count: counts[i],
                    ema: smoothed[i],
                    velocity: velocities[i],
                });
            }
        }
        points.sort_by(|a, b| a.day.cmp(&b.day).then(a.style.label().cmp(b.style.label())));

        info!(points = points.len(), span, "computed trend report");
        Self { span, points }
    }

    /// Velocity of the most recent day per style.
    ///
    /// This is the signal the composer boosts final scores with.
    pub fn latest_velocities(&self) -> HashMap<Style, f32> {
        let mut latest: HashMap<Style, (NaiveDate, f32)> = HashMap::new();
        for point in &self.points {
            match latest.get(&point.style) {
                Some((day, _)) if *day >= point.day => {}
                _ => {
                    latest.insert(point.style, (point.day, point.velocity));
                }
            }
        }
        latest.into_iter().map(|(s, (_, v))| (s, v)).collect()
    }

    /// Latest velocity for one style, if it has any signal
    pub fn latest_velocity(&self, style: Style) -> Option<f32> {
        self.latest_velocities().get(&style).copied()
    }

    /// Persist the report as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a previously saved report
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{EmbeddingRecord, Platform, SourceItem};
    use chrono::{TimeZone, Utc};

    fn build_index(per_day: &[(Style, u32, u32)]) -> CatalogIndex {
        // (style, day-of-month, count) triples
        let mut index = CatalogIndex::new();
        for &(style, day, count) in per_day {
            for n in 0..count {
                let id = index.insert_item(SourceItem {
                    platform: Platform::Reddit,
                    origin_id: format!("{style}-{day}-{n}"),
                    board: "streetwear".to_string(),
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
                    confidence: 0.9,
                });
            }
        }
        index
    }

    #[test]
    fn test_empty_catalog_yields_empty_report() {
        let report = TrendReport::compute(&CatalogIndex::new(), DEFAULT_SPAN);
        assert!(report.points.is_empty());
        assert!(report.latest_velocities().is_empty());
    }

    #[test]
    fn test_single_day_has_zero_velocity() {
        let index = build_index(&[(Style::Grunge, 10, 3)]);
        let report = TrendReport::compute(&index, DEFAULT_SPAN);

        assert_eq!(report.points.len(), 1);
        let point = &report.points[0];
        assert_eq!(point.count, 3);
        assert!((point.ema - 3.0).abs() < 1e-6);
        assert_eq!(point.velocity, 0.0);
    }

    #[test]
    fn test_rising_style_has_positive_velocity() {
        let index = build_index(&[
            (Style::Streetwear, 1, 1),
            (Style::Streetwear, 2, 2),
            (Style::Streetwear, 3, 4),
        ]);
        let report = TrendReport::compute(&index, DEFAULT_SPAN);

        let velocity = report.latest_velocity(Style::Streetwear).unwrap();
        assert!(velocity > 0.0);
    }

    #[test]
    fn test_falling_style_has_negative_velocity() {
        let index = build_index(&[
            (Style::Formal, 1, 5),
            (Style::Formal, 2, 2),
            (Style::Formal, 3, 1),
        ]);
        let report = TrendReport::compute(&index, DEFAULT_SPAN);

        let velocity = report.latest_velocity(Style::Formal).unwrap();
        assert!(velocity < 0.0);
    }

    #[test]
    fn test_latest_velocities_take_most_recent_day() {
        let index = build_index(&[
            (Style::Vintage, 1, 1),
            (Style::Vintage, 5, 4),
            (Style::Minimalist, 2, 2),
        ]);
        let report = TrendReport::compute(&index, DEFAULT_SPAN);

        let latest = report.latest_velocities();
        assert_eq!(latest.len(), 2);
        // Vintage rose from day 1 to day 5
        assert!(latest[&Style::Vintage] > 0.0);
        // Minimalist only has one day
        assert_eq!(latest[&Style::Minimalist], 0.0);
    }

    #[test]
    fn test_styles_are_bucketed_independently() {
        let index = build_index(&[
            (Style::Streetwear, 1, 2),
            (Style::Formal, 1, 1),
            (Style::Streetwear, 2, 3),
        ]);
        let report = TrendReport::compute(&index, DEFAULT_SPAN);

        let streetwear: Vec<_> = report
            .points
            .iter()
            .filter(|p| p.style == Style::Streetwear)
            .collect();
        assert_eq!(streetwear.len(), 2);
        assert_eq!(streetwear[0].count, 2);
        assert_eq!(streetwear[1].count, 3);

        let formal: Vec<_> = report
            .points
            .iter()
            .filter(|p| p.style == Style::Formal)
            .collect();
        assert_eq!(formal.len(), 1);
    }
}

//! Integration tests for the pipeline.
//!
//! These tests verify that filtering and trend scoring work together
//! in a realistic scenario: a small catalog with a clearly rising style
//! and a clearly declining one.

use catalog::{CatalogIndex, EmbeddingRecord, Platform, SourceItem, Style};
use chrono::{TimeZone, Utc};
use matcher::{Candidate, CandidateSource, UserProfile};
use pipeline::filters::*;
use pipeline::{FilterPipeline, TrendComposer};
use std::sync::Arc;
use trends::{TrendReport, DEFAULT_SPAN};

fn insert_tagged(index: &mut CatalogIndex, style: Style, confidence: f32, day: u32) -> u64 {
    let id = index.insert_item(SourceItem {
        platform: Platform::Reddit,
        origin_id: format!("post-{}", index.counts().0),
        board: "streetwear".to_string(),
        url: "https://i.redd.it/a.jpg".to_string(),
        local_path: format!("data/images/{}.jpg", index.counts().0),
        title: "fit check".to_string(),
        description: String::new(),
        created_at: Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
    });
    index.insert_embedding(EmbeddingRecord {
        item_id: id,
        vector: vec![1.0, 0.0],
        style,
        confidence,
    });
    id
}

fn create_test_setup() -> (Arc<CatalogIndex>, Vec<Candidate>) {
    let mut index = CatalogIndex::new();

    // Streetwear is rising: 1, 2, then 4 items per day
    let street = insert_tagged(&mut index, Style::Streetwear, 0.8, 10);
    for _ in 0..2 {
        insert_tagged(&mut index, Style::Streetwear, 0.8, 11);
    }
    for _ in 0..4 {
        insert_tagged(&mut index, Style::Streetwear, 0.8, 12);
    }

    // Formal is flat: one item per day
    insert_tagged(&mut index, Style::Formal, 0.9, 10);
    insert_tagged(&mut index, Style::Formal, 0.9, 11);
    let formal = insert_tagged(&mut index, Style::Formal, 0.9, 12);

    // A stale grunge item from early in the month and a weakly tagged one
    let stale = insert_tagged(&mut index, Style::Grunge, 0.7, 1);
    let weak = insert_tagged(&mut index, Style::Vintage, 0.15, 12);

    let candidates = vec![
        Candidate::new(street, CandidateSource::Similarity, 0.82, Style::Streetwear, 0.8),
        Candidate::new(formal, CandidateSource::Similarity, 0.85, Style::Formal, 0.9),
        Candidate::new(stale, CandidateSource::Similarity, 0.90, Style::Grunge, 0.7),
        Candidate::new(weak, CandidateSource::Similarity, 0.88, Style::Vintage, 0.15),
    ];

    (Arc::new(index), candidates)
}

#[test]
fn test_full_pipeline_filters_and_ranks() {
    let (catalog, candidates) = create_test_setup();
    let profile = UserProfile::new().with_embedding(vec![1.0, 0.0]);

    let pipeline = FilterPipeline::new()
        .add_filter(StyleAllowlistFilter)
        .add_filter(MinConfidenceFilter::new(0.3))
        .add_filter(FreshnessFilter::new(catalog.clone(), 7));

    let filtered = pipeline.apply(candidates, &profile).unwrap();

    // Stale grunge item and weakly tagged vintage item are gone
    assert_eq!(filtered.len(), 2);

    let report = TrendReport::compute(&catalog, DEFAULT_SPAN);
    let composer = TrendComposer::new(report.latest_velocities());
    let ranked = TrendComposer::rank(composer.compose(filtered), 10);

    // Streetwear has a rising velocity; its boost overcomes the small
    // base-score deficit against the flat formal item.
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].candidate.style, Style::Streetwear);
    assert!(ranked[0].score > ranked[1].score);
}

#[test]
fn test_style_allowlist_narrows_results() {
    let (catalog, candidates) = create_test_setup();
    let profile = UserProfile::new()
        .with_embedding(vec![1.0, 0.0])
        .with_styles([Style::Formal]);

    let pipeline = FilterPipeline::new()
        .add_filter(StyleAllowlistFilter)
        .add_filter(MinConfidenceFilter::new(0.3))
        .add_filter(FreshnessFilter::new(catalog, 7));

    let filtered = pipeline.apply(candidates, &profile).unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].style, Style::Formal);
}

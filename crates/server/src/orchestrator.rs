//! # Recommendation Orchestrator
//!
//! This module coordinates the entire recommendation pipeline:
//! 1. Embed the optional reference photo
//! 2. Generate candidates (similarity + trending in parallel)
//! 3. Merge and deduplicate candidates
//! 4. Apply filters
//! 5. Compose scores with the trend velocity boost
//! 6. Rank and enrich the top N with catalog metadata

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use catalog::{CatalogIndex, ItemId, Platform, Style};
use embedder::{vector::normalize, EmbeddingClient};
use matcher::{Candidate, CandidateSource, SimilaritySource, TrendingSource, UserProfile, VectorIndex};
use pipeline::filters::{FreshnessFilter, MinConfidenceFilter, StyleAllowlistFilter};
use pipeline::{FilterPipeline, TrendComposer};
use trends::TrendReport;

/// Minimum tagger confidence for a recommendable item
const MIN_CONFIDENCE: f32 = 0.3;
/// Maximum item age relative to the newest catalog item, in days
const MAX_AGE_DAYS: i64 = 30;

/// A recommendation request.
#[derive(Debug, Clone, Default)]
pub struct RecommendationRequest {
    /// Encoded bytes of the user's reference photo, if any
    pub photo: Option<Vec<u8>>,
    /// Styles to restrict results to; empty means all styles
    pub styles: Vec<Style>,
    /// Number of recommendations to return
    pub limit: usize,
}

/// Final recommendation returned to the user
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub url: String,
    pub local_path: String,
    pub platform: Platform,
    pub board: String,
    pub style: Style,
    pub score: f32,
    pub velocity: f32,
    pub source: CandidateSource,
    pub explanation: String,
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: Arc<CatalogIndex>,
    similarity: SimilaritySource,
    trending: TrendingSource,
    filter_pipeline: Arc<FilterPipeline>,
    composer: TrendComposer,
    embed_client: EmbeddingClient,
}

impl RecommendationOrchestrator {
    /// Create a new orchestrator with all components initialized.
    ///
    /// # Arguments
    /// * `catalog` - Shared reference to the loaded catalog
    /// * `report` - Trend report computed over the catalog
    /// * `embed_service_addr` - Address of the embedding model service
    ///   (e.g., "http://localhost:50051")
    pub async fn new(
        catalog: Arc<CatalogIndex>,
        report: &TrendReport,
        embed_service_addr: impl Into<String>,
    ) -> Result<Self> {
        let vector_index = Arc::new(VectorIndex::from_catalog(&catalog));
        let similarity = SimilaritySource::new(catalog.clone(), vector_index);
        let trending = TrendingSource::new(catalog.clone(), report.latest_velocities());
        let filter_pipeline = Arc::new(
            FilterPipeline::new()
                .add_filter(StyleAllowlistFilter)
                .add_filter(MinConfidenceFilter::new(MIN_CONFIDENCE))
                .add_filter(FreshnessFilter::new(catalog.clone(), MAX_AGE_DAYS)),
        );
        let composer = TrendComposer::new(report.latest_velocities());
        let embed_client = EmbeddingClient::connect(embed_service_addr).await?;
        Ok(Self {
            catalog,
            similarity,
            trending,
            filter_pipeline,
            composer,
            embed_client,
        })
    }

    /// Main entry point: get recommendations for a request.
    ///
    /// Returns recommendations sorted by score (highest first). Without a
    /// reference photo the results come entirely from the trending source.
    pub async fn get_recommendations(
        &self,
        request: RecommendationRequest,
    ) -> Result<Vec<Recommendation>> {
        let start_time = Instant::now();
        let limit = request.limit;

        let profile = self.build_profile(request).await?;
        info!(
            "Built profile (photo: {}, style filter: {})",
            profile.embedding.is_some(),
            profile.styles.len()
        );

        let (similarity_candidates, trending_candidates) =
            self.generate_candidates_parallel(&profile, limit).await?;
        info!(
            "Generated {} similarity candidates and {} trending candidates",
            similarity_candidates.len(),
            trending_candidates.len()
        );

        let merged = self.merge_candidates(similarity_candidates, trending_candidates);

        let filtered = self
            .filter_pipeline
            .apply(merged, &profile)
            .context("Failed to apply filters")?;
        info!("Applied filters, candidates remaining: {}", filtered.len());

        let ranked = TrendComposer::rank(self.composer.compose(filtered), limit);
        let recommendations = self.enrich(ranked);
        info!(
            "Selected top {} recommendations in {:.2?}",
            recommendations.len(),
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Build the user profile, embedding the reference photo if present.
    async fn build_profile(&self, request: RecommendationRequest) -> Result<UserProfile> {
        let mut profile = UserProfile::new().with_styles(request.styles);
        if let Some(photo) = request.photo {
            let mut client = self.embed_client.clone();
            let mut vectors = client
                .embed_images(vec![photo])
                .await
                .context("Failed to embed reference photo")?;
            let mut embedding = vectors
                .pop()
                .context("Embedding service returned no vector")?;
            normalize(&mut embedding);
            profile = profile.with_embedding(embedding);
        }
        Ok(profile)
    }

    /// Generate candidates from both sources in parallel
    async fn generate_candidates_parallel(
        &self,
        profile: &UserProfile,
        limit: usize,
    ) -> Result<(Vec<Candidate>, Vec<Candidate>)> {
        let (similarity_result, trending_result) = tokio::join!(
            tokio::task::spawn_blocking({
                let similarity = self.similarity.clone();
                let profile = profile.clone();
                move || similarity.get_candidates(&profile, limit)
            }),
            tokio::task::spawn_blocking({
                let trending = self.trending.clone();
                let profile = profile.clone();
                move || trending.get_candidates(&profile, limit)
            })
        );

        let similarity_candidates = similarity_result.context("Similarity task panicked")?;
        let trending_candidates = trending_result.context("Trending task panicked")?;
        Ok((similarity_candidates, trending_candidates))
    }

    /// Merge candidates from both sources and deduplicate by ItemId
    fn merge_candidates(
        &self,
        similarity_candidates: Vec<Candidate>,
        trending_candidates: Vec<Candidate>,
    ) -> Vec<Candidate> {
        let mut map: HashMap<ItemId, Candidate> = HashMap::new();

        let similarity_len = similarity_candidates.len();
        let trending_len = trending_candidates.len();

        for candidate in similarity_candidates.into_iter().chain(trending_candidates) {
            map.entry(candidate.item_id)
                .and_modify(|existing| {
                    if candidate.base_score > existing.base_score {
                        *existing = candidate.clone();
                    }
                })
                .or_insert(candidate);
        }

        let merged: Vec<Candidate> = map.into_values().collect();
        info!(
            "Merged candidates: similarity={}, trending={}, total_after_dedup={}",
            similarity_len,
            trending_len,
            merged.len()
        );
        merged
    }

    /// Enrich ranked candidates with catalog metadata
    fn enrich(&self, ranked: Vec<pipeline::ScoredCandidate>) -> Vec<Recommendation> {
        ranked
            .into_iter()
            .filter_map(|scored| {
                let candidate = scored.candidate;
                let item = self.catalog.get_item(candidate.item_id)?;
                let velocity = candidate.metadata.velocity.unwrap_or(0.0);
                Some(Recommendation {
                    item_id: candidate.item_id,
                    url: item.url.clone(),
                    local_path: item.local_path.clone(),
                    platform: item.platform,
                    board: item.board.clone(),
                    style: candidate.style,
                    score: scored.score,
                    velocity,
                    source: candidate.source,
                    explanation: format!(
                        "Score: {:.2}, Style: {} (velocity {:+.2}), Source: {:?}",
                        scored.score,
                        candidate.style.label(),
                        velocity,
                        candidate.source
                    ),
                })
            })
            .collect()
    }
}

//! Simple test harness for the recommendation orchestrator.
//!
//! This binary lets you test the end-to-end pipeline by requesting
//! trending recommendations against a previously ingested catalog.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber;

use catalog::CatalogIndex;
use server::{RecommendationOrchestrator, RecommendationRequest};
use trends::{TrendReport, DEFAULT_SPAN};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,matcher=debug,pipeline=debug")
        .init();

    info!("Starting trend-recs server test harness");

    info!("Loading catalog...");
    let path = Path::new("data");
    let catalog = Arc::new(CatalogIndex::load_from_files(path)?);
    let (items, embeddings) = catalog.counts();
    info!("Catalog loaded: {} items, {} embeddings", items, embeddings);

    info!("Computing trend report...");
    let report = TrendReport::compute(&catalog, DEFAULT_SPAN);

    // The embedding model service must be running on localhost:50051
    info!("Connecting to embedding service...");
    let orchestrator =
        RecommendationOrchestrator::new(catalog, &report, "http://localhost:50051").await?;
    info!("Connected to embedding service");

    let request = RecommendationRequest {
        photo: None,
        styles: vec![],
        limit: 10,
    };

    info!("Getting trending recommendations (limit: {})", request.limit);
    let recommendations = orchestrator.get_recommendations(request).await?;

    info!("Received {} recommendations:", recommendations.len());
    for (i, rec) in recommendations.iter().enumerate() {
        info!(
            "{}. {} - Score: {:.3} [{:?}]",
            i + 1,
            rec.url,
            rec.score,
            rec.source
        );
        info!("   {}", rec.explanation);
    }

    Ok(())
}

//! Pipeline for filtering and scoring outfit candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - TrendComposer for blending similarity with trend velocity
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. Filters remove unwanted candidates (excluded styles, weak tags, stale posts)
//! 2. TrendComposer scores the survivors (base score + velocity boost)
//! 3. Ranking sorts best-first and truncates to the requested count
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterPipeline, TrendComposer};
//! use pipeline::filters::*;
//!
//! // Build the filter pipeline
//! let pipeline = FilterPipeline::new()
//!     .add_filter(StyleAllowlistFilter)
//!     .add_filter(MinConfidenceFilter::new(0.3))
//!     .add_filter(FreshnessFilter::new(catalog.clone(), 30));
//!
//! // Apply filters
//! let filtered = pipeline.apply(candidates, &profile)?;
//!
//! // Score and rank
//! let composer = TrendComposer::new(report.latest_velocities());
//! let ranked = TrendComposer::rank(composer.compose(filtered), 10);
//! ```

pub mod composer;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use composer::{ScoredCandidate, TrendComposer, DEFAULT_VELOCITY_WEIGHT};
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;

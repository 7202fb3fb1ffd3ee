//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod freshness;
pub mod min_confidence;
pub mod style_allowlist;

// Re-export for convenience
pub use freshness::FreshnessFilter;
pub use min_confidence::MinConfidenceFilter;
pub use style_allowlist::StyleAllowlistFilter;

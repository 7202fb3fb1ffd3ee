//! Candidate and user profile types.

use catalog::{ItemId, Style};
use std::collections::HashSet;

/// Which source produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Embedding similarity to the user's reference photo
    Similarity,
    /// Recent items from high-velocity styles (no reference photo needed)
    Trending,
}

/// Extra per-candidate signals carried through the pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateMetadata {
    /// Cosine similarity to the user photo (similarity source only)
    pub similarity: Option<f32>,
    /// Style velocity at generation time (trending source only)
    pub velocity: Option<f32>,
}

/// A catalog item proposed for recommendation
#[derive(Debug, Clone)]
pub struct Candidate {
    pub item_id: ItemId,
    pub source: CandidateSource,
    /// Source-specific base score, higher is better
    pub base_score: f32,
    pub style: Style,
    /// Tagger confidence for the item's style
    pub confidence: f32,
    pub metadata: CandidateMetadata,
}

impl Candidate {
    pub fn new(
        item_id: ItemId,
        source: CandidateSource,
        base_score: f32,
        style: Style,
        confidence: f32,
    ) -> Self {
        Self {
            item_id,
            source,
            base_score,
            style,
            confidence,
            metadata: CandidateMetadata::default(),
        }
    }
}

/// What we know about the requesting user.
///
/// The embedding is derived from an optional reference photo and lives only
/// for the duration of the request; it is never persisted or shared.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    /// Unit-normalized embedding of the user's reference photo
    pub embedding: Option<Vec<f32>>,
    /// Styles the user asked to filter to; empty means all styles
    pub styles: HashSet<Style>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile built from a reference photo embedding
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Restrict recommendations to the given styles
    pub fn with_styles(mut self, styles: impl IntoIterator<Item = Style>) -> Self {
        self.styles = styles.into_iter().collect();
        self
    }

    /// True if the style passes the profile's allowlist
    pub fn allows(&self, style: Style) -> bool {
        self.styles.is_empty() || self.styles.contains(&style)
    }
}

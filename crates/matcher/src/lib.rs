//! # Matcher Crate
//!
//! Candidate generation for the recommendation pipeline. Two sources
//! feed the downstream filters and composer:
//!
//! - [`SimilaritySource`]: exact nearest-neighbor search over catalog
//!   embeddings, keyed by the user's reference photo
//! - [`TrendingSource`]: recent items from high-velocity styles, for
//!   requests without a photo
//!
//! Both return oversized pools (5x the requested limit) so filtering
//! can discard items without starving the final ranking.
//!
//! ## Example Usage
//!
//! ```ignore
//! use matcher::{SimilaritySource, TrendingSource, UserProfile, VectorIndex};
//!
//! let index = Arc::new(VectorIndex::from_catalog(&catalog));
//! let source = SimilaritySource::new(catalog.clone(), index);
//! let profile = UserProfile::new().with_embedding(photo_vector);
//! let candidates = source.get_candidates(&profile, 10);
//! ```

pub mod similarity;
pub mod trending;
pub mod types;
pub mod vector_index;

pub use similarity::SimilaritySource;
pub use trending::TrendingSource;
pub use types::{Candidate, CandidateMetadata, CandidateSource, UserProfile};
pub use vector_index::VectorIndex;

//! Filter enforcing the user's style allowlist.
//!
//! Drops candidates tagged with a style the user excluded. A profile
//! with an empty allowlist passes everything through.

use crate::traits::Filter;
use anyhow::Result;
use matcher::{Candidate, UserProfile};

/// Removes candidates whose style the profile does not allow.
pub struct StyleAllowlistFilter;

impl Filter for StyleAllowlistFilter {
    fn name(&self) -> &str {
        "StyleAllowlistFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, profile: &UserProfile) -> Result<Vec<Candidate>> {
        if profile.styles.is_empty() {
            return Ok(candidates);
        }
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| profile.allows(candidate.style))
            .collect();

        Ok(filtered)
    }
}

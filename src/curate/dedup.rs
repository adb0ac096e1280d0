//! Order-preserving deduplication on the trimmed (title, url) key.

use crate::models::Candidate;
use itertools::Itertools;
use tracing::info;

/// Drop later occurrences of an already-seen key; the first one wins.
pub fn dedup_keep_order(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let before = candidates.len();
    let unique: Vec<Candidate> = candidates.into_iter().unique_by(Candidate::key).collect();
    info!(before, after = unique.len(), "Removed duplicate candidates");
    unique
}

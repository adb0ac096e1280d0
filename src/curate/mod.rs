//! Candidate curation stages, applied in this order:
//!
//! 1. [`window`]: keep items from the three-day recency window
//! 2. [`dedup`]: drop repeated (title, url) pairs
//! 3. [`liveness`]: keep links that answer 200 with a matching page title
//! 4. [`categorize`]: keyword-score into categories, then cap each one

pub mod categorize;
pub mod dedup;
pub mod liveness;
pub mod window;

pub use categorize::Buckets;

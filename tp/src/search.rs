//! Reference-workout retrieval
//!
//! The prompt composer only needs `retrieve(query, k)`; the workout index
//! crate is the production implementation.

use eyre::Result;
use tracing::debug;
use workoutindex::{SearchHit, WorkoutIndex};

/// Ranked lookup of reference workouts
pub trait Retriever: Send + Sync {
    /// Up to `k` hits, most similar first; empty when nothing matches
    fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchHit>>;
}

impl Retriever for WorkoutIndex {
    fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        debug!(%query, %k, "WorkoutIndex::retrieve: called");
        Ok(self.search(query, k))
    }
}

/// Render hits as a bulleted list for a directive
pub fn format_references(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| {
            let mut line = format!("- {}", hit.title);
            let kind: Vec<&str> = [hit.workout_type.as_str(), hit.track.as_str()]
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect();
            if !kind.is_empty() {
                line.push_str(&format!(" ({})", kind.join(", ")));
            }
            let description = hit.description.split_whitespace().collect::<Vec<_>>().join(" ");
            if !description.is_empty() {
                line.push_str(": ");
                line.push_str(&description);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

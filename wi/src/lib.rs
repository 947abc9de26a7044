//! WorkoutIndex - reference workout lookup
//!
//! Holds a pre-populated catalogue of past workouts and answers "which stored
//! workouts look like this query?" so a plan generator can quote them as
//! reference material.
//!
//! # Layout
//!
//! ```text
//! {index_dir}/
//! └── workout_metadata.json   # JSON array of WorkoutRecord
//! ```
//!
//! # Example
//!
//! ```ignore
//! use workoutindex::WorkoutIndex;
//!
//! let index = WorkoutIndex::open("data/workout_metadata.json")?;
//! let hits = index.search("strength, conditioning", 5);
//! for hit in hits {
//!     println!("{} ({:.2})", hit.title, hit.distance);
//! }
//! ```

mod category;
pub mod cli;
pub mod config;
mod index;

pub use category::{Category, categorize};
pub use index::{IndexStats, SearchHit, SearchOptions, SearchResults, WorkoutIndex, WorkoutRecord};

/// Default number of hits returned by a search
pub const DEFAULT_TOP_K: usize = 10;

/// File name of the metadata catalogue inside an index directory
pub const METADATA_FILE: &str = "workout_metadata.json";

//! Workout categorization heuristics

use serde::{Deserialize, Serialize};

const WARMUP_KEYWORDS: [&str; 3] = ["pre-wod", "warmup", "mobility"];
const COOLDOWN_KEYWORDS: [&str; 3] = ["cooldown", "recovery", "stretch"];

/// Coarse role a stored workout plays in a training day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Warmup,
    Cooldown,
    Workout,
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warmup => write!(f, "warmup"),
            Self::Cooldown => write!(f, "cooldown"),
            Self::Workout => write!(f, "workout"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Classify a workout by its title keywords, falling back to whether it is scored
pub fn categorize(title: &str, score_type: &str) -> Category {
    let title = title.trim().to_lowercase();

    if WARMUP_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        Category::Warmup
    } else if COOLDOWN_KEYWORDS.iter().any(|kw| title.contains(kw)) {
        Category::Cooldown
    } else if !score_type.trim().is_empty() {
        Category::Workout
    } else {
        Category::Other
    }
}

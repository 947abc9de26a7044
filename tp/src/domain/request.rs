//! Plan request - the immutable input to one plan build

use serde::{Deserialize, Serialize};

/// Longest plan accepted; each week costs one generator call
pub const MAX_DURATION_WEEKS: u32 = 52;

fn default_experience() -> String {
    "intermediate".to_string()
}

fn default_sessions_per_week() -> u32 {
    5
}

/// Who the plan is for and what it should respect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Athlete name, also used to name the plan
    pub name: String,

    #[serde(default)]
    pub age: Option<u32>,

    /// Training background (e.g. "beginner", "intermediate")
    #[serde(default = "default_experience")]
    pub experience: String,

    #[serde(default)]
    pub goals: Vec<String>,

    #[serde(default)]
    pub equipment: Vec<String>,

    #[serde(default)]
    pub injuries: Vec<String>,

    /// Movements the athlete wants left out
    #[serde(default)]
    pub avoid_exercises: Vec<String>,

    #[serde(default = "default_sessions_per_week")]
    pub sessions_per_week: u32,

    /// Plan length in weeks
    pub duration: u32,

    /// Free-text constraints such as session length
    #[serde(default)]
    pub constraints: Option<String>,
}

impl PlanRequest {
    /// Check the request before any generator call is made
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.duration == 0 {
            return Err("duration must be at least one week".to_string());
        }
        if self.duration > MAX_DURATION_WEEKS {
            return Err(format!(
                "duration must be at most {} weeks, got {}",
                MAX_DURATION_WEEKS, self.duration
            ));
        }
        if self.sessions_per_week == 0 {
            return Err("sessions_per_week must be at least 1".to_string());
        }
        Ok(())
    }

    /// Name given to the assembled plan
    pub fn plan_name(&self) -> String {
        format!("{}'s Plan", self.name.trim())
    }
}

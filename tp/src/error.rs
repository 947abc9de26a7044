//! Plan build errors

use std::time::Duration;

use thiserror::Error;

use crate::cache::CacheError;
use crate::generator::GenerateError;
use crate::parser::MalformedPlanError;

/// Why a plan build stopped
///
/// Every per-week variant names the week that failed. Cache corruption never
/// shows up here; it is recovered by regenerating the week.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid plan request: {0}")]
    InvalidRequest(String),

    #[error("Week {week}: failed to compose directive: {message}")]
    Prompt { week: u32, message: String },

    #[error("Week {week}: {source}")]
    Upstream {
        week: u32,
        #[source]
        source: GenerateError,
    },

    #[error("Week {week}: malformed generator output: {source}")]
    Malformed {
        week: u32,
        #[source]
        source: MalformedPlanError,
    },

    #[error("Week {week}: {source}")]
    Cache {
        week: u32,
        #[source]
        source: CacheError,
    },

    #[error("Failed to save assembled plan: {0}")]
    PlanWrite(#[source] CacheError),
}

impl BuildError {
    /// Week the build failed on, when the failure belongs to one
    pub fn week(&self) -> Option<u32> {
        match self {
            BuildError::Prompt { week, .. }
            | BuildError::Upstream { week, .. }
            | BuildError::Malformed { week, .. }
            | BuildError::Cache { week, .. } => Some(*week),
            BuildError::InvalidRequest(_) | BuildError::PlanWrite(_) => None,
        }
    }

    /// Wait suggested before resuming, when the week was refused by a rate limit
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BuildError::Upstream { source, .. } => source.retry_after(),
            _ => None,
        }
    }
}

//! Week directive composition

use std::sync::Arc;

use eyre::{Result, eyre};
use serde::Serialize;
use tracing::{debug, warn};

use super::PromptLoader;
use super::embedded::PLAN_SCHEMA;
use crate::domain::PlanRequest;
use crate::search::{Retriever, format_references};

/// Session length used when the request states no constraints
pub const DEFAULT_SESSION_DURATION: &str = "75-90 minutes";

/// Stand-in for the previous-week summary when composing week 1
pub const BASELINE_SUMMARY: &str = "No data from previous weeks provided. Start with baseline workouts for week 1.";

/// Default number of reference workouts requested
pub const DEFAULT_REFERENCES: usize = 5;

/// Values the `week` template can reference
#[derive(Debug, Serialize)]
struct WeekContext<'a> {
    week: u32,
    name: &'a str,
    age: Option<u32>,
    experience: &'a str,
    goals: String,
    equipment: String,
    injuries: String,
    avoid_exercises: String,
    sessions_per_week: u32,
    constraints: &'a str,
    previous_summary: &'a str,
    references: Option<String>,
    schema: &'static str,
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

/// Builds the directive for each week of a plan
///
/// Composition is deterministic for a fixed request, week and summary as
/// long as the retriever is.
pub struct PromptComposer {
    loader: PromptLoader,
    retriever: Option<Arc<dyn Retriever>>,
    references: usize,
}

impl PromptComposer {
    pub fn new(loader: PromptLoader) -> Self {
        debug!("PromptComposer::new: called");
        Self {
            loader,
            retriever: None,
            references: DEFAULT_REFERENCES,
        }
    }

    /// Quote up to `k` reference workouts in every directive
    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>, k: usize) -> Self {
        debug!(%k, "PromptComposer::with_retriever: called");
        self.retriever = Some(retriever);
        self.references = k;
        self
    }

    /// The rendered `system` template
    pub fn system_prompt(&self) -> Result<String> {
        debug!("PromptComposer::system_prompt: called");
        self.loader.render("system", &serde_json::json!({}))
    }

    /// Directive for `week` (1-based) given the previous week's summary
    ///
    /// Pass an empty summary for week 1.
    pub fn compose(&self, request: &PlanRequest, week: u32, prior_summary: &str) -> Result<String> {
        debug!(%week, summary_len = prior_summary.len(), "PromptComposer::compose: called");
        if week == 0 {
            return Err(eyre!("Week numbers start at 1"));
        }

        let previous_summary = if prior_summary.trim().is_empty() {
            BASELINE_SUMMARY
        } else {
            prior_summary
        };

        let context = WeekContext {
            week,
            name: request.name.trim(),
            age: request.age,
            experience: &request.experience,
            goals: list_or_none(&request.goals),
            equipment: list_or_none(&request.equipment),
            injuries: list_or_none(&request.injuries),
            avoid_exercises: list_or_none(&request.avoid_exercises),
            sessions_per_week: request.sessions_per_week,
            constraints: request
                .constraints
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(DEFAULT_SESSION_DURATION),
            previous_summary,
            references: self.references_for(request),
            schema: PLAN_SCHEMA.trim(),
        };

        self.loader.render("week", &context)
    }

    /// Reference text for the request's goals; retrieval problems only cost the references
    fn references_for(&self, request: &PlanRequest) -> Option<String> {
        let retriever = self.retriever.as_ref()?;
        if self.references == 0 || request.goals.is_empty() {
            return None;
        }

        let query = request.goals.join(", ");
        match retriever.retrieve(&query, self.references) {
            Ok(hits) if hits.is_empty() => {
                debug!(%query, "PromptComposer::references_for: no matches");
                None
            }
            Ok(hits) => Some(format_references(&hits)),
            Err(e) => {
                warn!(%query, error = %e, "Reference retrieval failed, composing without references");
                None
            }
        }
    }
}

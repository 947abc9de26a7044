//! Plan orchestrator
//!
//! Builds a plan one week at a time. Each week is taken from the cache when
//! possible and otherwise composed, generated, cached and parsed; its summary
//! then feeds the next week's directive.

use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::domain::{Plan, PlanRequest, Week};
use crate::error::BuildError;
use crate::generator::RateLimitedGenerator;
use crate::parser::parse_week;
use crate::prompts::PromptComposer;
use crate::summary::summarize;

/// Where one week's build currently stands
#[derive(Debug)]
enum WeekStep {
    CheckCache,
    ParseCached(String),
    Compose,
    Generate(String),
    CacheWrite(String),
    Parse(String),
    Done(Week),
}

/// Drives the week-by-week build of a plan
pub struct PlanOrchestrator {
    composer: PromptComposer,
    generator: RateLimitedGenerator,
    cache: ResponseCache,
    refresh: bool,
}

impl PlanOrchestrator {
    pub fn new(composer: PromptComposer, generator: RateLimitedGenerator, cache: ResponseCache) -> Self {
        debug!(cache_dir = ?cache.dir(), "PlanOrchestrator::new: called");
        Self {
            composer,
            generator,
            cache,
            refresh: false,
        }
    }

    /// Ignore cached responses and regenerate every week
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Build the full plan for `request`
    ///
    /// Either every requested week is produced or the first unrecovered
    /// failure is returned; weeks finished before a failure stay in the cache
    /// so a later build resumes from them.
    pub async fn build(&self, request: &PlanRequest) -> Result<Plan, BuildError> {
        debug!(name = %request.name, duration = request.duration, "PlanOrchestrator::build: called");
        request.validate().map_err(BuildError::InvalidRequest)?;
        info!(
            "Building {}-week plan for {} in {}",
            request.duration,
            request.name,
            self.cache.dir().display()
        );

        let mut weeks = Vec::with_capacity(request.duration as usize);
        let mut summary = String::new();

        for week in 1..=request.duration {
            let built = self.build_week(request, week, &summary).await?;
            summary = summarize(&built);
            debug!(%week, summary_len = summary.len(), "PlanOrchestrator::build: week complete");
            weeks.push(built);
        }

        let plan = Plan {
            name: request.plan_name(),
            weeks,
        };
        self.cache.put_plan(&plan).map_err(BuildError::PlanWrite)?;

        info!("Built plan '{}' with {} weeks", plan.name, plan.weeks.len());
        Ok(plan)
    }

    async fn build_week(&self, request: &PlanRequest, week: u32, summary: &str) -> Result<Week, BuildError> {
        debug!(%week, refresh = self.refresh, "PlanOrchestrator::build_week: called");
        let mut step = if self.refresh {
            WeekStep::Compose
        } else {
            WeekStep::CheckCache
        };

        loop {
            step = match step {
                WeekStep::CheckCache => match self.cache.get(week) {
                    Ok(Some(raw)) => WeekStep::ParseCached(raw),
                    Ok(None) => WeekStep::Compose,
                    Err(e) if e.is_corrupt() => {
                        warn!(%week, error = %e, "Discarding corrupt cache entry");
                        self.discard(week)?;
                        WeekStep::Compose
                    }
                    Err(source) => return Err(BuildError::Cache { week, source }),
                },
                WeekStep::ParseCached(raw) => match parse_week(&raw) {
                    Ok(parsed) => {
                        info!("Week {}: using cached response", week);
                        WeekStep::Done(parsed)
                    }
                    Err(e) => {
                        warn!(%week, error = %e, "Cached response does not parse, regenerating");
                        self.discard(week)?;
                        WeekStep::Compose
                    }
                },
                WeekStep::Compose => {
                    let directive =
                        self.composer
                            .compose(request, week, summary)
                            .map_err(|e| BuildError::Prompt {
                                week,
                                message: format!("{:#}", e),
                            })?;
                    WeekStep::Generate(directive)
                }
                WeekStep::Generate(directive) => {
                    info!("Week {}: requesting generator output", week);
                    let raw = self
                        .generator
                        .generate(&directive)
                        .await
                        .map_err(|source| BuildError::Upstream { week, source })?;
                    WeekStep::CacheWrite(raw)
                }
                WeekStep::CacheWrite(raw) => {
                    // persisted before parsing so a bad payload can be inspected without another call
                    self.cache
                        .put(week, &raw)
                        .map_err(|source| BuildError::Cache { week, source })?;
                    WeekStep::Parse(raw)
                }
                WeekStep::Parse(raw) => {
                    let parsed = parse_week(&raw).map_err(|source| BuildError::Malformed { week, source })?;
                    WeekStep::Done(parsed)
                }
                WeekStep::Done(parsed) => return Ok(parsed),
            };
        }
    }

    fn discard(&self, week: u32) -> Result<(), BuildError> {
        self.cache
            .remove(week)
            .map_err(|source| BuildError::Cache { week, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Throttle;
    use crate::llm::client::mock::MockLlmClient;
    use crate::prompts::PromptLoader;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    const WEEK_JSON: &str = r#"{"days": [{"sessions": [{"kind": "Strength", "details": {"description": "Back Squat", "sets": 5, "reps": 5, "intensity": "75%"}}]}]}"#;

    fn request(duration: u32) -> PlanRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Sam",
            "goals": ["strength"],
            "equipment": ["barbell"],
            "duration": duration,
        }))
        .unwrap()
    }

    fn orchestrator(mock: Arc<MockLlmClient>, temp: &TempDir) -> PlanOrchestrator {
        let generator = RateLimitedGenerator::new(mock, Arc::new(Throttle::new(Duration::from_secs(20))));
        let composer = PromptComposer::new(PromptLoader::embedded_only());
        PlanOrchestrator::new(composer, generator, ResponseCache::new(temp.path()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_one_week() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockLlmClient::with_texts([WEEK_JSON]));
        let orchestrator = orchestrator(mock.clone(), &temp);

        let plan = orchestrator.build(&request(1)).await.unwrap();
        assert_eq!(plan.name, "Sam's Plan");
        assert_eq!(plan.weeks.len(), 1);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(orchestrator.cache().get(1).unwrap().as_deref(), Some(WEEK_JSON));
        assert_eq!(orchestrator.cache().get_plan().unwrap(), Some(plan));
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_feeds_next_week() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockLlmClient::with_texts([WEEK_JSON, WEEK_JSON]));
        let orchestrator = orchestrator(mock.clone(), &temp);

        orchestrator.build(&request(2)).await.unwrap();

        let requests = mock.requests();
        assert!(requests[1].messages[0].content.contains("Day 1: Strength - Back Squat, 5x5 at 75%"));
        assert!(!requests[0].messages[0].content.contains("Day 1: Strength"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_request_makes_no_calls() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockLlmClient::with_texts([WEEK_JSON]));
        let orchestrator = orchestrator(mock.clone(), &temp);

        let err = orchestrator.build(&request(0)).await.unwrap_err();
        assert!(matches!(err, BuildError::InvalidRequest(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_duration_rejected_before_any_call() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockLlmClient::with_texts([WEEK_JSON]));
        let orchestrator = orchestrator(mock.clone(), &temp);

        let err = orchestrator.build(&request(4_000_000_000)).await.unwrap_err();
        assert!(matches!(err, BuildError::InvalidRequest(ref msg) if msg.contains("at most")));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_output_is_cached_then_reported() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockLlmClient::with_texts(["not json at all"]));
        let orchestrator = orchestrator(mock.clone(), &temp);

        let err = orchestrator.build(&request(1)).await.unwrap_err();
        assert_eq!(err.week(), Some(1));
        assert!(matches!(err, BuildError::Malformed { .. }));
        assert_eq!(orchestrator.cache().get(1).unwrap().as_deref(), Some("not json at all"));
        assert!(orchestrator.cache().get_plan().unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparseable_cache_hit_is_regenerated() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockLlmClient::with_texts([WEEK_JSON]));
        let orchestrator = orchestrator(mock.clone(), &temp);
        orchestrator.cache().put(1, r#"{"days": [{"sessions": [{"kind": "Yoga"}]}]}"#).unwrap();

        let plan = orchestrator.build(&request(1)).await.unwrap();
        assert_eq!(plan.weeks.len(), 1);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(orchestrator.cache().get(1).unwrap().as_deref(), Some(WEEK_JSON));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_bypasses_cache() {
        let temp = TempDir::new().unwrap();
        let mock = Arc::new(MockLlmClient::with_texts([WEEK_JSON]));
        let orchestrator = orchestrator(mock.clone(), &temp).with_refresh(true);
        orchestrator.cache().put(1, WEEK_JSON).unwrap();

        orchestrator.build(&request(1)).await.unwrap();
        assert_eq!(mock.call_count(), 1);
    }
}

//! End-to-end plan builds against a scripted generator

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::time::Instant;

use trainplan::{
    BuildError, CompletionRequest, CompletionResponse, GenerateError, LlmClient, LlmError, MalformedPlanError,
    PlanOrchestrator, PlanRequest, PromptComposer, PromptLoader, RateLimitedGenerator, ResponseCache, Throttle,
};

const MIN_INTERVAL: Duration = Duration::from_secs(20);

const WEEK_ONE: &str = r#"```json
{
  "name": "Sam's Program",
  "weeks": [{
    "days": [
      {"sessions": [
        {"type": "Strength", "details": {"description": "Back Squat", "sets": 5, "reps": 5, "intensity": "70% of 1RM", "notes": "Controlled tempo"}},
        {"type": "WOD", "details": {"description": "AMRAP 10: 5 power cleans, 10 burpees", "intended_stimulus": "Steady grind"}}
      ]},
      {"sessions": [{"type": "Rest Day", "details": {}}]}
    ]
  }]
}
```"#;

const WEEK_TWO: &str = r#"{"days": [
  {"sessions": [{"kind": "Strength", "details": {"description": "Back Squat", "sets": 5, "reps": 3, "intensity": "77% of 1RM"}}]},
  {"sessions": [{"kind": "ActiveRecovery", "details": {"duration": "40 minutes"}}]}
]}"#;

enum Reply {
    Text(&'static str),
    ServerError,
}

/// Generator stand-in that replays canned replies and records call times
struct ScriptedClient {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(Instant, String)>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    fn directives(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, d)| d.clone()).collect()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let directive = request.messages.first().map(|m| m.content.clone()).unwrap_or_default();
        self.calls.lock().unwrap().push((Instant::now(), directive));

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Text(text)) => Ok(CompletionResponse::text(text)),
            Some(Reply::ServerError) => Err(LlmError::ApiError {
                status: 500,
                message: "upstream exploded".to_string(),
            }),
            None => Err(LlmError::InvalidResponse("script exhausted".to_string())),
        }
    }
}

fn sam(duration: u32) -> PlanRequest {
    serde_yaml::from_str(&format!(
        "name: Sam\nage: 30\nexperience: intermediate\ngoals: [strength]\nequipment: [barbell]\nduration: {}\n",
        duration
    ))
    .unwrap()
}

fn orchestrator(client: Arc<ScriptedClient>, cache_dir: &std::path::Path) -> PlanOrchestrator {
    let generator = RateLimitedGenerator::new(client, Arc::new(Throttle::new(MIN_INTERVAL))).with_json_mode(true);
    let composer = PromptComposer::new(PromptLoader::embedded_only());
    PlanOrchestrator::new(composer, generator, ResponseCache::new(cache_dir))
}

#[tokio::test(start_paused = true)]
async fn test_fresh_build_makes_one_spaced_call_per_week() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(vec![Reply::Text(WEEK_ONE), Reply::Text(WEEK_TWO)]);

    let plan = orchestrator(client.clone(), temp.path()).build(&sam(2)).await.unwrap();

    assert_eq!(plan.name, "Sam's Plan");
    assert_eq!(plan.weeks.len(), 2);
    for week in &plan.weeks {
        assert!(!week.days.is_empty());
        assert!(week.days.iter().any(|d| !d.sessions.is_empty()));
    }

    assert_eq!(client.call_count(), 2);
    let times = client.call_times();
    assert!(times[1] - times[0] >= MIN_INTERVAL);

    // week 2 is told what week 1 looked like
    let directives = client.directives();
    assert!(directives[1].contains("Day 1: Strength - Back Squat, 5x5 at 70% of 1RM | Notes: Controlled tempo;"));
    assert!(directives[1].contains("Day 2: Rest Day - Recovery & Rest."));
}

#[tokio::test(start_paused = true)]
async fn test_warm_cache_build_is_identical_and_free() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(vec![Reply::Text(WEEK_ONE), Reply::Text(WEEK_TWO)]);

    let first = orchestrator(client.clone(), temp.path()).build(&sam(2)).await.unwrap();
    let second = orchestrator(client.clone(), temp.path()).build(&sam(2)).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(client.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_corrupt_week_two_is_regenerated() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(vec![Reply::Text(WEEK_ONE), Reply::Text(WEEK_TWO)]);
    orchestrator(client.clone(), temp.path()).build(&sam(2)).await.unwrap();

    let cache = ResponseCache::new(temp.path());
    std::fs::write(cache.week_path(2), "{\"raw_response\": \"trunc").unwrap();
    client.push(Reply::Text(WEEK_TWO));

    let plan = orchestrator(client.clone(), temp.path()).build(&sam(2)).await.unwrap();

    assert_eq!(plan.weeks.len(), 2);
    assert_eq!(client.call_count(), 3);
    assert_eq!(cache.get(2).unwrap().as_deref(), Some(WEEK_TWO));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_session_kind_fails_the_build() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(vec![Reply::Text(
        r#"{"days": [{"sessions": [{"kind": "Unknown", "details": {}}]}]}"#,
    )]);

    let err = orchestrator(client.clone(), temp.path()).build(&sam(1)).await.unwrap_err();

    match err {
        BuildError::Malformed { week, source } => {
            assert_eq!(week, 1);
            assert!(matches!(source, MalformedPlanError::UnknownSessionKind { ref kind, .. } if kind == "Unknown"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(ResponseCache::new(temp.path()).get_plan().unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_upstream_failure_names_the_week_and_keeps_progress() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(vec![Reply::Text(WEEK_ONE), Reply::ServerError]);

    let err = orchestrator(client.clone(), temp.path()).build(&sam(2)).await.unwrap_err();

    assert_eq!(err.week(), Some(2));
    assert!(matches!(
        err,
        BuildError::Upstream {
            source: GenerateError::Upstream(LlmError::ApiError { status: 500, .. }),
            ..
        }
    ));
    // no retry
    assert_eq!(client.call_count(), 2);

    // resuming only pays for the missing week
    client.push(Reply::Text(WEEK_TWO));
    let plan = orchestrator(client.clone(), temp.path()).build(&sam(2)).await.unwrap();
    assert_eq!(plan.weeks.len(), 2);
    assert_eq!(client.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_regenerates_every_week() {
    let temp = TempDir::new().unwrap();
    let client = ScriptedClient::new(vec![Reply::Text(WEEK_ONE), Reply::Text(WEEK_TWO)]);
    orchestrator(client.clone(), temp.path()).build(&sam(1)).await.unwrap();

    orchestrator(client.clone(), temp.path())
        .with_refresh(true)
        .build(&sam(1))
        .await
        .unwrap();

    assert_eq!(client.call_count(), 2);
    assert_eq!(
        ResponseCache::new(temp.path()).get(1).unwrap().as_deref(),
        Some(WEEK_TWO)
    );
}

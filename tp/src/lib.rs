//! Trainplan - multi-week training plan synthesis
//!
//! Builds a plan one week at a time by asking an external text generator for
//! each week, caching every raw response, and parsing it into a strictly
//! typed plan tree. A short summary of each week is carried into the next
//! week's directive so the plan progresses instead of repeating itself.
//!
//! # Modules
//!
//! - [`domain`] - Plan request and the Plan/Week/Day/Session tree
//! - [`prompts`] - Template loading and per-week directive composition
//! - [`generator`] - Throttled generator calls
//! - [`llm`] - Generator client trait and OpenAI implementation
//! - [`cache`] - Per-run store of raw responses
//! - [`parser`] - Raw output to typed weeks and plans
//! - [`summary`] - Week digests used as context for the next week
//! - [`orchestrator`] - The week-by-week build loop
//! - [`search`] - Reference workout retrieval
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod llm;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod search;
pub mod summary;

// Re-export commonly used types
pub use cache::{CacheError, ResponseCache};
pub use config::{Config, LlmConfig};
pub use domain::{Day, Plan, PlanRequest, Session, SessionKind, Week};
pub use error::BuildError;
pub use generator::{GenerateError, RateLimitedGenerator, Throttle};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use orchestrator::PlanOrchestrator;
pub use parser::{MalformedPlanError, parse_plan, parse_week, strip_code_fence};
pub use prompts::{PromptComposer, PromptLoader};
pub use search::Retriever;
pub use summary::{summarize, summarize_plan};

//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{name}.pmt` (configured override)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

mod composer;
pub mod embedded;
mod loader;

pub use composer::{BASELINE_SUMMARY, DEFAULT_REFERENCES, DEFAULT_SESSION_DURATION, PromptComposer};
pub use loader::PromptLoader;

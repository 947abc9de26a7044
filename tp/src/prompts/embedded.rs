//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Generator role line
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Weekly plan directive
pub const WEEK: &str = include_str!("../../prompts/week.pmt");

/// Output-shape description interpolated into the week directive
pub const PLAN_SCHEMA: &str = include_str!("../../prompts/schema.json");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "system" => Some(SYSTEM),
        "week" => Some(WEEK),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

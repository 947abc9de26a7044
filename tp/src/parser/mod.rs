//! Plan parser
//!
//! Turns raw generator output into the typed plan hierarchy. The output is
//! untrusted: every required field is checked, optional fields get their
//! documented defaults, and an unrecognized session kind fails the whole
//! parse instead of being dropped.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

mod fence;
mod session;

pub use fence::strip_code_fence;
pub use session::session_kind;

use crate::domain::{Plan, Week};
use session::{as_object, parse_week_value, required_array};

/// Generator output that does not describe a valid week or plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedPlanError {
    /// `raw` holds the complete output; it is left out of the message
    #[error("Generator output is not valid JSON ({reason}); {} bytes of raw output kept", .raw.len())]
    InvalidJson { reason: String, raw: String },

    #[error("Missing required field '{path}'")]
    MissingField { path: String },

    #[error("Field '{path}' must be {expected}")]
    InvalidField { path: String, expected: &'static str },

    #[error("Unknown session kind '{kind}' at '{path}'")]
    UnknownSessionKind { path: String, kind: String },

    #[error("Plan contains no weeks")]
    NoWeeks,

    #[error("Week at '{path}' contains no days")]
    EmptyWeek { path: String },
}

/// Bare JSON is taken as is; only output that fails to parse is unfenced
fn parse_tree(raw: &str) -> Result<Value, MalformedPlanError> {
    if let Ok(tree) = serde_json::from_str(raw.trim()) {
        return Ok(tree);
    }

    let body = strip_code_fence(raw);
    serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "parse_tree: invalid JSON");
        MalformedPlanError::InvalidJson {
            reason: e.to_string(),
            raw: raw.to_string(),
        }
    })
}

/// Parse one week of generator output
///
/// Accepts a bare week (`{"days": [...]}`) or a full plan object, in which
/// case the first week is taken. Paths in errors are relative to whichever
/// shape was supplied.
pub fn parse_week(raw: &str) -> Result<Week, MalformedPlanError> {
    debug!(raw_len = raw.len(), "parse_week: called");
    let tree = parse_tree(raw)?;
    let obj = as_object(&tree, "")?;

    if obj.contains_key("weeks") {
        debug!("parse_week: full plan object, taking first week");
        let weeks = required_array(obj, "", "weeks")?;
        if weeks.len() > 1 {
            warn!(dropped = weeks.len() - 1, "parse_week: output holds several weeks, keeping only the first");
        }
        let first = weeks.first().ok_or(MalformedPlanError::NoWeeks)?;
        return parse_week_value(first, "weeks[0]");
    }

    parse_week_value(&tree, "")
}

/// Parse a complete plan object; `name` is required
pub fn parse_plan(raw: &str) -> Result<Plan, MalformedPlanError> {
    debug!(raw_len = raw.len(), "parse_plan: called");
    let tree = parse_tree(raw)?;
    let obj = as_object(&tree, "")?;

    let name = match obj.get("name") {
        None | Some(Value::Null) => {
            return Err(MalformedPlanError::MissingField {
                path: "name".to_string(),
            });
        }
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            return Err(MalformedPlanError::InvalidField {
                path: "name".to_string(),
                expected: "string",
            });
        }
    };

    let weeks = required_array(obj, "", "weeks")?;
    if weeks.is_empty() {
        return Err(MalformedPlanError::NoWeeks);
    }

    let weeks = weeks
        .iter()
        .enumerate()
        .map(|(idx, week)| parse_week_value(week, &format!("weeks[{}]", idx)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Plan { name, weeks })
}

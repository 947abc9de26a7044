//! Tree walkers that turn untyped JSON into the plan hierarchy

use serde_json::{Map, Value};

use super::MalformedPlanError;
use crate::domain::{
    ActiveRecovery, DEFAULT_RECOVERY_ACTIVITIES, DEFAULT_RECOVERY_DESCRIPTION, DEFAULT_RECOVERY_DURATION,
    DEFAULT_RECOVERY_INTENSITY, DEFAULT_REST_NOTES, Day, Movement, RestDay, Session, SessionKind, Strength, Week, Wod,
};

type Result<T> = std::result::Result<T, MalformedPlanError>;

/// Join a field onto a path, `weeks[0]` + `days` => `weeks[0].days`
pub(super) fn join(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "$".to_string() } else { path.to_string() }
}

pub(super) fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| MalformedPlanError::InvalidField {
        path: display_path(path),
        expected: "object",
    })
}

/// Required array field; `null` counts as missing
pub(super) fn required_array<'a>(obj: &'a Map<String, Value>, prefix: &str, key: &str) -> Result<&'a Vec<Value>> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(MalformedPlanError::MissingField {
            path: join(prefix, key),
        }),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(MalformedPlanError::InvalidField {
            path: join(prefix, key),
            expected: "array",
        }),
    }
}

/// Parse one week object at `path`
pub(super) fn parse_week_value(value: &Value, path: &str) -> Result<Week> {
    let obj = as_object(value, path)?;
    let days_path = join(path, "days");
    let days = required_array(obj, path, "days")?;
    if days.is_empty() {
        return Err(MalformedPlanError::EmptyWeek {
            path: display_path(path),
        });
    }

    let days = days
        .iter()
        .enumerate()
        .map(|(idx, day)| parse_day(day, &format!("{}[{}]", days_path, idx)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Week { days })
}

fn parse_day(value: &Value, path: &str) -> Result<Day> {
    let obj = as_object(value, path)?;
    let sessions_path = join(path, "sessions");
    let sessions = required_array(obj, path, "sessions")?
        .iter()
        .enumerate()
        .map(|(idx, session)| parse_session(session, &format!("{}[{}]", sessions_path, idx)))
        .collect::<Result<Vec<_>>>()?;

    Ok(Day { sessions })
}

/// Map a generator tag onto a session kind
///
/// Case-insensitive; spaces, `-` and `_` are ignored so `Rest Day`,
/// `rest_day` and `RestDay` all match.
pub fn session_kind(tag: &str) -> Option<SessionKind> {
    let normalized: String = tag
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect();

    SessionKind::ALL
        .into_iter()
        .find(|kind| kind.tag().to_lowercase() == normalized)
}

fn parse_session(value: &Value, path: &str) -> Result<Session> {
    let obj = as_object(value, path)?;

    let (tag_key, tag) = match (obj.get("kind"), obj.get("type")) {
        (Some(tag), _) if !tag.is_null() => ("kind", tag),
        (_, Some(tag)) if !tag.is_null() => ("type", tag),
        _ => {
            return Err(MalformedPlanError::MissingField {
                path: join(path, "kind"),
            });
        }
    };
    let tag = tag.as_str().ok_or_else(|| MalformedPlanError::InvalidField {
        path: join(path, tag_key),
        expected: "string",
    })?;

    let kind = session_kind(tag).ok_or_else(|| MalformedPlanError::UnknownSessionKind {
        path: display_path(path),
        kind: tag.to_string(),
    })?;

    let details_path = join(path, "details");
    let details = match obj.get("details") {
        None | Some(Value::Null) => Details::empty(details_path),
        Some(value) => Details::new(as_object(value, &details_path)?, details_path),
    };

    let session = match kind {
        SessionKind::Wod => Session::Wod(Wod {
            description: details.required_text("description")?,
            intended_stimulus: details.optional_text("intended_stimulus", "")?,
            scaling_options: details.optional_text("scaling_options", "")?,
            movements: details.movements()?,
        }),
        SessionKind::Strength => Session::Strength(Strength {
            description: details.required_text("description")?,
            sets: details.required_text("sets")?,
            reps: details.required_text("reps")?,
            intensity: details.optional_text("intensity", "")?,
            rest: details.optional_text("rest", "")?,
            notes: details.optional_text("notes", "")?,
        }),
        SessionKind::RestDay => Session::RestDay(RestDay {
            notes: details.optional_text("notes", DEFAULT_REST_NOTES)?,
            description: details.optional_text("description", DEFAULT_REST_NOTES)?,
        }),
        SessionKind::ActiveRecovery => Session::ActiveRecovery(ActiveRecovery {
            activities: details.optional_list("activities", &DEFAULT_RECOVERY_ACTIVITIES)?,
            duration: details.optional_text("duration", DEFAULT_RECOVERY_DURATION)?,
            intensity: details.optional_text("intensity", DEFAULT_RECOVERY_INTENSITY)?,
            description: details.optional_text("description", DEFAULT_RECOVERY_DESCRIPTION)?,
        }),
    };

    Ok(session)
}

/// Field accessor for one `details` object that remembers where it sits
struct Details<'a> {
    map: Option<&'a Map<String, Value>>,
    path: String,
}

impl<'a> Details<'a> {
    fn new(map: &'a Map<String, Value>, path: String) -> Self {
        Self { map: Some(map), path }
    }

    fn empty(path: String) -> Self {
        Self { map: None, path }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(key)).filter(|v| !v.is_null())
    }

    fn field_path(&self, key: &str) -> String {
        join(&self.path, key)
    }

    /// Text field; numbers are accepted and kept as their JSON text
    fn text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(MalformedPlanError::InvalidField {
                path: self.field_path(key),
                expected: "string or number",
            }),
        }
    }

    fn required_text(&self, key: &str) -> Result<String> {
        self.text(key)?.ok_or_else(|| MalformedPlanError::MissingField {
            path: self.field_path(key),
        })
    }

    fn optional_text(&self, key: &str, default: &str) -> Result<String> {
        Ok(self.text(key)?.unwrap_or_else(|| default.to_string()))
    }

    fn optional_list(&self, key: &str, default: &[&str]) -> Result<Vec<String>> {
        let Some(value) = self.get(key) else {
            return Ok(default.iter().map(|s| s.to_string()).collect());
        };
        let items = value.as_array().ok_or_else(|| MalformedPlanError::InvalidField {
            path: self.field_path(key),
            expected: "array of strings",
        })?;

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| MalformedPlanError::InvalidField {
                        path: format!("{}[{}]", self.field_path(key), idx),
                        expected: "string",
                    })
            })
            .collect()
    }

    fn movements(&self) -> Result<Vec<Movement>> {
        let Some(value) = self.get("movements") else {
            return Ok(Vec::new());
        };
        let base = self.field_path("movements");
        let items = value.as_array().ok_or_else(|| MalformedPlanError::InvalidField {
            path: base.clone(),
            expected: "array",
        })?;

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let path = format!("{}[{}]", base, idx);
                match item {
                    // a bare string is taken as the description
                    Value::String(description) => Ok(Movement {
                        description: description.clone(),
                        resources: None,
                    }),
                    Value::Object(map) => {
                        let fields = Details::new(map, path);
                        Ok(Movement {
                            description: fields.required_text("description")?,
                            resources: fields.text("resources")?.filter(|r| !r.trim().is_empty()),
                        })
                    }
                    _ => Err(MalformedPlanError::InvalidField {
                        path,
                        expected: "object",
                    }),
                }
            })
            .collect()
    }
}

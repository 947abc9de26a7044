//! Plan hierarchy
//!
//! A Plan owns its Weeks, a Week owns its Days, a Day owns its Sessions and a
//! WOD session owns its Movements. Nothing is shared and nothing points back up.

use serde::{Deserialize, Serialize};

/// Default rest-day text used when the generator leaves it out
pub const DEFAULT_REST_NOTES: &str = "Take the day off to recover.";

/// Default active-recovery activities used when the generator leaves them out
pub const DEFAULT_RECOVERY_ACTIVITIES: [&str; 2] = ["Mobility work", "Foam rolling"];

pub const DEFAULT_RECOVERY_DURATION: &str = "30-60 minutes";
pub const DEFAULT_RECOVERY_INTENSITY: &str = "Low";
pub const DEFAULT_RECOVERY_DESCRIPTION: &str = "Recovery session";

/// A complete multi-week training plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    pub weeks: Vec<Week>,
}

/// One generated week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub days: Vec<Day>,
}

/// One training day, possibly without sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub sessions: Vec<Session>,
}

/// A training session, tagged by kind
///
/// Serialized as `{"kind": "...", "details": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "details")]
pub enum Session {
    #[serde(rename = "WOD")]
    Wod(Wod),
    Strength(Strength),
    RestDay(RestDay),
    ActiveRecovery(ActiveRecovery),
}

impl Session {
    pub fn kind(&self) -> SessionKind {
        match self {
            Self::Wod(_) => SessionKind::Wod,
            Self::Strength(_) => SessionKind::Strength,
            Self::RestDay(_) => SessionKind::RestDay,
            Self::ActiveRecovery(_) => SessionKind::ActiveRecovery,
        }
    }
}

/// Discriminator for [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Wod,
    Strength,
    RestDay,
    ActiveRecovery,
}

impl SessionKind {
    pub const ALL: [SessionKind; 4] = [Self::Wod, Self::Strength, Self::RestDay, Self::ActiveRecovery];

    /// Wire tag used in the plan output schema
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Wod => "WOD",
            Self::Strength => "Strength",
            Self::RestDay => "RestDay",
            Self::ActiveRecovery => "ActiveRecovery",
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wod => write!(f, "WOD"),
            Self::Strength => write!(f, "Strength"),
            Self::RestDay => write!(f, "Rest Day"),
            Self::ActiveRecovery => write!(f, "Active Recovery"),
        }
    }
}

/// Conditioning workout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wod {
    pub description: String,
    pub intended_stimulus: String,
    pub scaling_options: String,
    pub movements: Vec<Movement>,
}

/// One movement inside a WOD
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub description: String,
    /// Reference link, if the generator supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<String>,
}

/// Loaded strength work
///
/// `sets` and `reps` are kept as text so complexes like `"1+2"` survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strength {
    pub description: String,
    pub sets: String,
    pub reps: String,
    pub intensity: String,
    pub rest: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestDay {
    pub notes: String,
    pub description: String,
}

impl Default for RestDay {
    fn default() -> Self {
        Self {
            notes: DEFAULT_REST_NOTES.to_string(),
            description: DEFAULT_REST_NOTES.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRecovery {
    pub activities: Vec<String>,
    pub duration: String,
    pub intensity: String,
    pub description: String,
}

impl Default for ActiveRecovery {
    fn default() -> Self {
        Self {
            activities: DEFAULT_RECOVERY_ACTIVITIES.iter().map(|a| a.to_string()).collect(),
            duration: DEFAULT_RECOVERY_DURATION.to_string(),
            intensity: DEFAULT_RECOVERY_INTENSITY.to_string(),
            description: DEFAULT_RECOVERY_DESCRIPTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_serializes_with_kind_and_details() {
        let session = Session::Strength(Strength {
            description: "Back Squat".to_string(),
            sets: "5".to_string(),
            reps: "3".to_string(),
            intensity: "80%".to_string(),
            rest: "2 min".to_string(),
            notes: String::new(),
        });

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["kind"], "Strength");
        assert_eq!(value["details"]["sets"], "5");
    }

    #[test]
    fn test_wod_tag_and_optional_resources() {
        let session = Session::Wod(Wod {
            description: "Cindy".to_string(),
            intended_stimulus: String::new(),
            scaling_options: String::new(),
            movements: vec![Movement {
                description: "Pull-ups".to_string(),
                resources: None,
            }],
        });

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["kind"], "WOD");
        assert!(value["details"]["movements"][0].get("resources").is_none());
    }

    #[test]
    fn test_plan_json_shape_round_trips() {
        let plan = Plan {
            name: "Sam's Plan".to_string(),
            weeks: vec![Week {
                days: vec![Day {
                    sessions: vec![Session::RestDay(RestDay::default())],
                }],
            }],
        };

        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains(r#""kind":"RestDay""#));
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn test_session_kind() {
        let session = Session::ActiveRecovery(ActiveRecovery::default());
        assert_eq!(session.kind(), SessionKind::ActiveRecovery);
        assert_eq!(session.kind().tag(), "ActiveRecovery");
        assert_eq!(session.kind().to_string(), "Active Recovery");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(RestDay::default().notes, DEFAULT_REST_NOTES);
        let recovery = ActiveRecovery::default();
        assert_eq!(recovery.activities, vec!["Mobility work", "Foam rolling"]);
        assert_eq!(recovery.intensity, "Low");
    }
}

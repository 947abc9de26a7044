//! Week summaries
//!
//! A summary is the only context one week passes to the next, so it keeps
//! the load-bearing detail of every session in day order.

use std::fmt::Write;

use tracing::debug;

use crate::domain::{Plan, Session, Week};

/// Compress one week into a single line of text
///
/// Deterministic: the same week always yields the same string.
pub fn summarize(week: &Week) -> String {
    debug!(days = week.days.len(), "summarize: called");
    week.days
        .iter()
        .enumerate()
        .map(|(idx, day)| {
            let mut line = format!("Day {}:", idx + 1);
            for session in &day.sessions {
                push_session(&mut line, session);
            }
            line
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One summary per week, in week order
pub fn summarize_plan(plan: &Plan) -> Vec<String> {
    debug!(weeks = plan.weeks.len(), "summarize_plan: called");
    plan.weeks.iter().map(summarize).collect()
}

fn push_session(line: &mut String, session: &Session) {
    // writing into a String cannot fail
    let _ = match session {
        Session::Wod(wod) => write!(
            line,
            " WOD - {} | Stimulus: {};",
            wod.description, wod.intended_stimulus
        ),
        Session::Strength(s) => write!(
            line,
            " Strength - {}, {}x{} at {} | Notes: {};",
            s.description, s.sets, s.reps, s.intensity, s.notes
        ),
        Session::RestDay(_) => write!(line, " Rest Day - Recovery & Rest."),
        Session::ActiveRecovery(r) => write!(
            line,
            " Active Recovery - {}, Duration: {};",
            r.activities.join(", "),
            r.duration
        ),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActiveRecovery, Day, RestDay, Strength, Wod};
    use proptest::prelude::*;

    fn strength(description: &str, sets: &str, reps: &str) -> Session {
        Session::Strength(Strength {
            description: description.to_string(),
            sets: sets.to_string(),
            reps: reps.to_string(),
            intensity: "80% of 1RM".to_string(),
            rest: "2 minutes".to_string(),
            notes: "Brace".to_string(),
        })
    }

    fn wod(description: &str) -> Session {
        Session::Wod(Wod {
            description: description.to_string(),
            intended_stimulus: "Sprint".to_string(),
            scaling_options: String::new(),
            movements: Vec::new(),
        })
    }

    fn sample_week() -> Week {
        Week {
            days: vec![
                Day {
                    sessions: vec![strength("Back Squat", "5", "3"), wod("Fran")],
                },
                Day {
                    sessions: vec![Session::RestDay(RestDay::default())],
                },
                Day {
                    sessions: vec![Session::ActiveRecovery(ActiveRecovery::default())],
                },
            ],
        }
    }

    #[test]
    fn test_summarize_format() {
        assert_eq!(
            summarize(&sample_week()),
            "Day 1: Strength - Back Squat, 5x3 at 80% of 1RM | Notes: Brace; WOD - Fran | Stimulus: Sprint; \
             Day 2: Rest Day - Recovery & Rest. \
             Day 3: Active Recovery - Mobility work, Foam rolling, Duration: 30-60 minutes;"
        );
    }

    #[test]
    fn test_day_without_sessions() {
        let week = Week {
            days: vec![Day { sessions: vec![] }, Day { sessions: vec![wod("Cindy")] }],
        };
        assert_eq!(summarize(&week), "Day 1: Day 2: WOD - Cindy | Stimulus: Sprint;");
    }

    #[test]
    fn test_summarize_plan() {
        let plan = Plan {
            name: "Sam's Plan".to_string(),
            weeks: vec![sample_week(), sample_week()],
        };
        let lines = summarize_plan(&plan);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
    }

    proptest! {
        #[test]
        fn prop_summary_is_deterministic_and_ordered(
            days in proptest::collection::vec(
                proptest::collection::vec(("[A-Za-z ]{1,12}", "[0-9]{1,2}", "[0-9+]{1,4}"), 0..4),
                1..7,
            )
        ) {
            let week = Week {
                days: days
                    .iter()
                    .map(|sessions| Day {
                        sessions: sessions.iter().map(|(d, s, r)| strength(d, s, r)).collect(),
                    })
                    .collect(),
            };

            let first = summarize(&week);
            prop_assert_eq!(&first, &summarize(&week.clone()));
            for idx in 1..=week.days.len() {
                let marker = format!("Day {}:", idx);
                prop_assert!(first.contains(&marker));
            }
        }
    }
}

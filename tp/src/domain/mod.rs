//! Domain types for plan synthesis

mod plan;
mod request;

pub use plan::{
    ActiveRecovery, DEFAULT_RECOVERY_ACTIVITIES, DEFAULT_RECOVERY_DESCRIPTION, DEFAULT_RECOVERY_DURATION,
    DEFAULT_RECOVERY_INTENSITY, DEFAULT_REST_NOTES, Day, Movement, Plan, RestDay, Session, SessionKind, Strength,
    Week, Wod,
};
pub use request::{MAX_DURATION_WEEKS, PlanRequest};

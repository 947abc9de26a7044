//! Rate-limited access to the external generator
//!
//! A [`Throttle`] owns the "last successful call" timestamp; a
//! [`RateLimitedGenerator`] pairs it with an [`LlmClient`](crate::llm::LlmClient).

mod rate_limited;
mod throttle;

pub use rate_limited::{GenerateError, RateLimitedGenerator};
pub use throttle::{Throttle, ThrottleGuard};

//! Transform job orchestration
//!
//! A [`TransformJob`] runs one attempt at a time: it drives the step timeline
//! on a fixed schedule while the backend call is in flight, jumps to the final
//! step when the call resolves, waits a short grace period and then hands the
//! response to the completion callback. Attempts can be cancelled (teardown or
//! a changed request) and retried from scratch.
//!
//! Progress is published through a `tokio::sync::watch` channel; see
//! [`TransformJob::subscribe`].

mod job;
mod state;
mod timers;

pub use job::{CompletionCallback, JobTiming, TransformJob};
pub use state::{JobPhase, JobState};

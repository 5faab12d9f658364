//! Synthetic job identifiers for fallback responses.
//!
//! Ids look like `job-<unix-millis>`. A bare wall-clock timestamp collides
//! when two fallbacks resolve within the same millisecond and goes backwards
//! when the clock is adjusted, so the generator never issues a value at or
//! below the last one it handed out.

use std::sync::atomic::{AtomicU64, Ordering};

static GLOBAL: JobIdGenerator = JobIdGenerator::new();

/// Next process-wide synthetic job id.
#[must_use]
pub fn next_job_id() -> String {
    GLOBAL.next_id()
}

/// Issues strictly increasing millisecond stamps.
#[derive(Debug, Default)]
pub struct JobIdGenerator {
    last: AtomicU64,
}

impl JobIdGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn next_id(&self) -> String {
        format!("job-{}", self.next_stamp(now_millis()))
    }

    /// Stamp for a clock reading of `now`: `now` itself unless that would not
    /// be strictly greater than the previous stamp.
    pub fn next_stamp(&self, now: u64) -> u64 {
        let stamp_after = |last: u64| now.max(last.saturating_add(1));
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(stamp_after(last))
            })
            .unwrap_or_else(|last| last);
        stamp_after(previous)
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

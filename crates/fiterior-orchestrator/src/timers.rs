//! Step timers owned by a running attempt.

use fiterior_catalog::StepTimeline;
use tokio::time::{Instant, sleep_until};

/// The pending step advances of one attempt.
///
/// Step `i` (for `i` in `1..len`) is due `i * interval` after `started`.
/// Deadlines are absolute, so [`StepTimers::fire`] is cancel-safe and can sit
/// in a `select!` loop; a late poll fires overdue steps back to back, in order.
#[derive(Debug)]
pub(crate) struct StepTimers {
    timeline: StepTimeline,
    started: Instant,
    next: usize,
}

impl StepTimers {
    pub(crate) fn new(timeline: StepTimeline, started: Instant) -> Self {
        Self {
            timeline,
            started,
            next: 1,
        }
    }

    /// No step left to advance to.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.next > self.timeline.final_index()
    }

    /// Wait for the next deadline and return the step index it advances to.
    ///
    /// Must not be polled once [`StepTimers::is_exhausted`] is true.
    pub(crate) async fn fire(&mut self) -> usize {
        let index = self.next;
        sleep_until(self.started + self.timeline.deadline_for(index)).await;
        self.next += 1;
        index
    }
}

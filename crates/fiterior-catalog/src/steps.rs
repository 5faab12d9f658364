//! Progress timeline shown while a transform job runs.
//!
//! The timeline is driven by wall-clock time only; it says nothing about what
//! the backend is actually doing.

use serde::Serialize;
use std::time::Duration;

/// One phase label of the progress timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadingStep {
    pub key: &'static str,
    pub label: &'static str,
}

pub static LOADING_STEPS: [LoadingStep; 4] = [
    LoadingStep {
        key: "upload",
        label: "Loading your photo",
    },
    LoadingStep {
        key: "prepare",
        label: "Preparing the transformation",
    },
    LoadingStep {
        key: "generate",
        label: "AI is restyling your interior",
    },
    LoadingStep {
        key: "polish",
        label: "Polishing colours and details",
    },
];

/// Default delay between two consecutive steps.
pub const STATUS_INTERVAL: Duration = Duration::from_millis(1400);

/// Read-only view over an ordered step catalog and its advance interval.
///
/// Step `i` becomes current `i * interval` after an attempt starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTimeline {
    steps: &'static [LoadingStep],
    interval: Duration,
}

impl Default for StepTimeline {
    fn default() -> Self {
        Self::new(&LOADING_STEPS, STATUS_INTERVAL)
    }
}

impl StepTimeline {
    /// Build a timeline over `steps`.
    ///
    /// # Panics
    ///
    /// Panics if `steps` is empty; a timeline always has a first step.
    #[must_use]
    pub const fn new(steps: &'static [LoadingStep], interval: Duration) -> Self {
        assert!(!steps.is_empty(), "step timeline needs at least one step");
        Self { steps, interval }
    }

    /// Same steps, different pacing.
    #[must_use]
    pub const fn with_interval(self, interval: Duration) -> Self {
        Self {
            steps: self.steps,
            interval,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the last step.
    #[must_use]
    pub const fn final_index(&self) -> usize {
        self.steps.len() - 1
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn step_at(&self, index: usize) -> Option<&'static LoadingStep> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn label_at(&self, index: usize) -> Option<&'static str> {
        self.step_at(index).map(|step| step.label)
    }

    /// Offset from the attempt start at which `index` becomes current.
    #[must_use]
    pub fn deadline_for(&self, index: usize) -> Duration {
        self.interval
            .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn steps(&self) -> &'static [LoadingStep] {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_timeline() {
        let timeline = StepTimeline::default();
        assert_eq!(timeline.len(), 4);
        assert_eq!(timeline.final_index(), 3);
        assert_eq!(timeline.interval(), Duration::from_millis(1400));
        assert_eq!(timeline.label_at(0), Some("Loading your photo"));
        assert_eq!(timeline.step_at(3).unwrap().key, "polish");
        assert_eq!(timeline.label_at(4), None);
    }

    #[test]
    fn test_deadlines() {
        let timeline = StepTimeline::default();
        assert_eq!(timeline.deadline_for(0), Duration::ZERO);
        assert_eq!(timeline.deadline_for(1), Duration::from_millis(1400));
        assert_eq!(timeline.deadline_for(3), Duration::from_millis(4200));
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = LOADING_STEPS.iter().map(|s| s.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), LOADING_STEPS.len());
    }

    proptest! {
        #[test]
        fn prop_deadlines_strictly_increase(interval_ms in 1u64..10_000) {
            let timeline = StepTimeline::default().with_interval(Duration::from_millis(interval_ms));
            for i in 1..timeline.len() {
                prop_assert!(timeline.deadline_for(i) > timeline.deadline_for(i - 1));
            }
        }
    }
}

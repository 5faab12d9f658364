//! The transform job: one live attempt, its timers and its cancellation.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{Instrument, debug, warn};

use fiterior_catalog::StepTimeline;
use fiterior_client::{
    TransformBackend, TransformError, TransformOutcome, TransformRequest, TransformResponse,
};
use fiterior_config::{Config, DEFAULT_GRACE_DELAY_MS, DEFAULT_STEP_INTERVAL_MS};
use fiterior_utils::error::CONVERSION_FAILED_MESSAGE;
use fiterior_utils::logging::{job_span, log_attempt_complete, log_attempt_failed};

use crate::state::{JobPhase, JobState};
use crate::timers::StepTimers;

/// Receives the response of a completed attempt.
///
/// Called at most once per attempt, from the attempt's task, never while the
/// state channel is locked.
pub type CompletionCallback = Arc<dyn Fn(TransformResponse) + Send + Sync>;

/// Pacing of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobTiming {
    /// Delay between two step advances
    pub step_interval: Duration,
    /// Pause between showing the final step and firing the callback
    pub grace_delay: Duration,
}

impl Default for JobTiming {
    fn default() -> Self {
        Self {
            step_interval: Duration::from_millis(DEFAULT_STEP_INTERVAL_MS),
            grace_delay: Duration::from_millis(DEFAULT_GRACE_DELAY_MS),
        }
    }
}

impl JobTiming {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            step_interval: config.step_interval(),
            grace_delay: config.grace_delay(),
        }
    }
}

/// The live attempt: its cancellation flag and the task running it.
struct Attempt {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Attempt {
    /// Flip the flag under the state lock, then stop the task.
    ///
    /// Every mutation the task makes checks the flag under the same lock, so
    /// once this returns the attempt can no longer touch the state.
    fn cancel(&self, state: &watch::Sender<JobState>) {
        state.send_if_modified(|_| {
            self.cancelled.store(true, Ordering::SeqCst);
            false
        });
        self.task.abort();
    }

    /// Cancel and wait for the task to be gone.
    async fn stop(self, state: &watch::Sender<JobState>) {
        self.cancel(state);
        if let Err(e) = self.task.await
            && e.is_panic()
        {
            warn!(error = %e, "Transform attempt task panicked");
        }
    }
}

/// Apply `update` unless the attempt was cancelled. Returns whether it applied.
fn publish(
    state: &watch::Sender<JobState>,
    cancelled: &AtomicBool,
    update: impl FnOnce(&mut JobState),
) -> bool {
    state.send_if_modified(|current| {
        if cancelled.load(Ordering::SeqCst) {
            return false;
        }
        update(current);
        true
    })
}

/// The backend call, running in its own task so a panic in the backend
/// surfaces as a [`tokio::task::JoinError`] instead of killing the attempt.
///
/// Aborted when dropped, which happens when the attempt task is aborted.
struct BackendCall(JoinHandle<Result<TransformOutcome, TransformError>>);

impl BackendCall {
    fn spawn(backend: Arc<dyn TransformBackend>, request: TransformRequest) -> Self {
        let call = async move { backend.transform(&request).await };
        Self(tokio::spawn(call.in_current_span()))
    }
}

impl Drop for BackendCall {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Everything an attempt task needs, moved into it at spawn time.
struct AttemptContext {
    attempt: u32,
    backend: Arc<dyn TransformBackend>,
    request: TransformRequest,
    on_complete: CompletionCallback,
    timeline: StepTimeline,
    grace_delay: Duration,
    state: Arc<watch::Sender<JobState>>,
    cancelled: Arc<AtomicBool>,
}

async fn run_attempt(ctx: AttemptContext) {
    let AttemptContext {
        attempt,
        backend,
        request,
        on_complete,
        timeline,
        grace_delay,
        state,
        cancelled,
    } = ctx;

    let started = Instant::now();
    let mut timers = StepTimers::new(timeline, started);
    let mut call = BackendCall::spawn(backend, request);

    let joined = loop {
        tokio::select! {
            biased;
            joined = &mut call.0 => break joined,
            index = timers.fire(), if !timers.is_exhausted() => {
                if publish(&state, &cancelled, |s| s.step_index = index) {
                    debug!(step_index = index, "Advanced progress step");
                }
            }
        }
    };
    // Remaining step timers go away with `timers`; nothing can overwrite the
    // forced final index below.
    drop(timers);
    let elapsed_ms = started.elapsed().as_millis();
    let result = match joined {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(format!("backend call panicked: {e}")),
    };

    match result {
        Ok(outcome) => {
            let fallback = outcome.is_fallback();
            let response = outcome.into_response();
            let final_index = timeline.final_index();

            if !publish(&state, &cancelled, |s| {
                s.step_index = final_index;
                s.phase = JobPhase::Completing;
            }) {
                return;
            }

            tokio::time::sleep(grace_delay).await;

            if !publish(&state, &cancelled, |s| s.phase = JobPhase::Done) {
                return;
            }
            log_attempt_complete(attempt, &response.job_id, fallback, elapsed_ms);
            on_complete(response);
        }
        Err(cause) => {
            log_attempt_failed(attempt, &cause, elapsed_ms);
            publish(&state, &cancelled, |s| {
                s.phase = JobPhase::Failed;
                s.error = Some(CONVERSION_FAILED_MESSAGE.to_string());
            });
        }
    }
}

/// Orchestrates transform attempts for one request.
///
/// At most one attempt is live. Activating, retrying or changing the request
/// starts a fresh attempt at step 0; the previous one is cancelled first, so
/// its timers and callback can never leak into the new attempt.
///
/// Must be created inside a tokio runtime. Dropping the job cancels the live
/// attempt without waiting for its task: on a multi-thread runtime a callback
/// that was already past the `Done` publish can still run after `drop`
/// returns. [`TransformJob::deactivate`] cancels and also waits for the
/// attempt task to finish, so nothing of the attempt runs once it returns.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use fiterior_client::{ClientSettings, TransformClient, TransformRequest};
/// use fiterior_orchestrator::{JobTiming, TransformJob};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TransformClient::new(ClientSettings::default())?;
/// let job = TransformJob::activate(
///     Arc::new(client),
///     TransformRequest::new("file://room.jpg", "nordic", "gpt-4o"),
///     Arc::new(|response| println!("done: {}", response.result_url)),
///     JobTiming::default(),
/// );
/// let settled = job.settled().await;
/// println!("{:?}", settled.phase);
/// # Ok(())
/// # }
/// ```
pub struct TransformJob {
    backend: Arc<dyn TransformBackend>,
    request: TransformRequest,
    on_complete: CompletionCallback,
    timeline: StepTimeline,
    grace_delay: Duration,
    state: Arc<watch::Sender<JobState>>,
    attempt: u32,
    current: Option<Attempt>,
}

impl fmt::Debug for TransformJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformJob")
            .field("request", &self.request)
            .field("timeline", &self.timeline)
            .field("grace_delay", &self.grace_delay)
            .field("state", &*self.state.borrow())
            .field("active", &self.current.is_some())
            .finish_non_exhaustive()
    }
}

impl TransformJob {
    /// Create the job and start its first attempt.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn activate(
        backend: Arc<dyn TransformBackend>,
        request: TransformRequest,
        on_complete: CompletionCallback,
        timing: JobTiming,
    ) -> Self {
        let (state, _) = watch::channel(JobState::default());
        let mut job = Self {
            backend,
            request,
            on_complete,
            timeline: StepTimeline::default().with_interval(timing.step_interval),
            grace_delay: timing.grace_delay,
            state: Arc::new(state),
            attempt: 0,
            current: None,
        };
        job.start_attempt();
        job
    }

    fn start_attempt(&mut self) {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.state.send_replace(JobState::running(self.attempt));

        let span = job_span(
            self.attempt,
            self.request.theme_id.as_deref(),
            self.request.model_id.as_deref(),
        );
        let ctx = AttemptContext {
            attempt: self.attempt,
            backend: Arc::clone(&self.backend),
            request: self.request.clone(),
            on_complete: Arc::clone(&self.on_complete),
            timeline: self.timeline,
            grace_delay: self.grace_delay,
            state: Arc::clone(&self.state),
            cancelled: Arc::clone(&cancelled),
        };
        let task = tokio::spawn(run_attempt(ctx).instrument(span));

        debug!(attempt = self.attempt, "Started transform attempt");
        self.current = Some(Attempt { cancelled, task });
    }

    /// Cancel the live attempt and wait until its task has finished.
    ///
    /// Afterwards the state no longer changes and the callback does not fire.
    /// The last published state is left as it was. Idempotent.
    pub async fn deactivate(&mut self) {
        if let Some(attempt) = self.current.take() {
            attempt.stop(&self.state).await;
            debug!(attempt = self.attempt, "Deactivated transform attempt");
        }
    }

    /// Start over with the same request as a new attempt.
    ///
    /// Valid from any phase. The previous attempt is fully stopped before the
    /// new one schedules anything.
    pub async fn retry(&mut self) {
        self.deactivate().await;
        self.attempt = self.attempt.saturating_add(1);
        self.start_attempt();
    }

    /// Replace the request.
    ///
    /// A different request is a different job: the live attempt is cancelled,
    /// the attempt counter resets and a fresh attempt starts. Returns `false`
    /// (and changes nothing) when the request is unchanged.
    pub async fn set_request(&mut self, request: TransformRequest) -> bool {
        if request == self.request {
            return false;
        }
        self.deactivate().await;
        self.request = request;
        self.attempt = 0;
        self.start_attempt();
        true
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> JobState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }

    /// Wait until the live attempt is `Done` or `Failed` and return that state.
    ///
    /// Returns the current state right away when no attempt is live.
    pub async fn settled(&self) -> JobState {
        if self.current.is_none() {
            return self.state();
        }
        let mut rx = self.subscribe();
        match rx.wait_for(|s| s.phase.is_terminal()).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.state(),
        }
    }

    #[must_use]
    pub fn timeline(&self) -> StepTimeline {
        self.timeline
    }

    #[must_use]
    pub fn request(&self) -> &TransformRequest {
        &self.request
    }

    /// Whether an attempt is live (not deactivated).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

impl Drop for TransformJob {
    fn drop(&mut self) {
        if let Some(attempt) = self.current.take() {
            attempt.cancel(&self.state);
        }
    }
}

//! One user-facing transform: validate, run the job, retry on failure,
//! summarise the result.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

use fiterior_catalog::{Model, StepTimeline, Theme, find_model, find_theme};
use fiterior_client::{
    FallbackReason, TransformBackend, TransformClient, TransformOutcome, TransformRequest,
};
use fiterior_config::Config;
use fiterior_orchestrator::{JobPhase, JobState, JobTiming, TransformJob};
use fiterior_utils::error::{FiteriorError, TransformError, ValidationError};

use crate::result::ResultSummary;

/// Progress notifications delivered to a session observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A new attempt started (0 for the first one)
    AttemptStarted { attempt: u32 },
    /// The attempt moved to step `index` of `total`
    Step {
        index: usize,
        total: usize,
        label: &'static str,
    },
    /// The attempt failed; `message` is the user-facing text
    AttemptFailed { attempt: u32, message: String },
}

/// Wraps a backend and remembers whether its latest outcome was a fallback.
///
/// The completion callback only carries the response; this is how the
/// session learns which branch produced it.
struct OutcomeTap {
    inner: Arc<dyn TransformBackend>,
    last_fallback: Mutex<Option<FallbackReason>>,
}

impl OutcomeTap {
    fn new(inner: Arc<dyn TransformBackend>) -> Self {
        Self {
            inner,
            last_fallback: Mutex::new(None),
        }
    }

    fn last_fallback(&self) -> Option<FallbackReason> {
        self.last_fallback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl TransformBackend for OutcomeTap {
    async fn transform(
        &self,
        request: &TransformRequest,
    ) -> Result<TransformOutcome, TransformError> {
        let outcome = self.inner.transform(request).await?;
        *self
            .last_fallback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = outcome.fallback_reason().cloned();
        Ok(outcome)
    }
}

/// Check that the request names a photo, a known theme and a known model.
///
/// # Errors
///
/// Returns `ValidationError` for missing fields or ids absent from the catalogs.
pub fn validate_request(
    request: &TransformRequest,
) -> Result<(&'static Theme, &'static Model), ValidationError> {
    let missing = request.missing_fields();
    if !missing.is_empty() {
        return Err(ValidationError::IncompleteRequest { missing });
    }

    let theme_id = request.theme_id.as_deref().unwrap_or_default();
    let theme = find_theme(theme_id).ok_or_else(|| ValidationError::UnknownTheme {
        id: theme_id.to_string(),
    })?;

    let model_id = request.model_id.as_deref().unwrap_or_default();
    let model = find_model(model_id).ok_or_else(|| ValidationError::UnknownModel {
        id: model_id.to_string(),
    })?;

    Ok((theme, model))
}

/// Runs a transform the way the app's loading screen does.
///
/// # Example
///
/// ```rust,no_run
/// use fiterior::{Config, TransformRequest, TransformSession};
///
/// # async fn run() -> Result<(), fiterior::FiteriorError> {
/// let config = Config::builder().build()?;
/// let session = TransformSession::from_config(&config)?.with_max_retries(1);
/// let request = TransformRequest::new("file://room.jpg", "nordic", "gpt-4o");
/// let summary = session.run(request, |event| println!("{event:?}")).await?;
/// println!("{} -> {}", summary.original_image, summary.result_url);
/// # Ok(())
/// # }
/// ```
pub struct TransformSession {
    backend: Arc<dyn TransformBackend>,
    timing: JobTiming,
    max_retries: u32,
}

impl TransformSession {
    /// Session talking HTTP to the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `FiteriorError::Transform` if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, FiteriorError> {
        let client = TransformClient::from_config(config)?;
        Ok(Self::with_backend(
            Arc::new(client),
            JobTiming::from_config(config),
        ))
    }

    /// Session over any backend.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn TransformBackend>, timing: JobTiming) -> Self {
        Self {
            backend,
            timing,
            max_retries: 0,
        }
    }

    /// Retry a failed attempt up to `retries` more times.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// The step timeline this session's jobs follow.
    #[must_use]
    pub fn timeline(&self) -> StepTimeline {
        StepTimeline::default().with_interval(self.timing.step_interval)
    }

    /// Validate `request`, run it to completion and summarise the result.
    ///
    /// `observer` sees every attempt start, every observed step change and
    /// every failed attempt. Step changes are observed, not replayed: a fast
    /// backend can jump straight from the first step to the last.
    ///
    /// # Errors
    ///
    /// - `FiteriorError::Validation` when the request is incomplete or names
    ///   an unknown theme or model (nothing is submitted)
    /// - `FiteriorError::Transform(JobFailed)` when every attempt failed
    pub async fn run<F>(
        &self,
        request: TransformRequest,
        mut observer: F,
    ) -> Result<ResultSummary, FiteriorError>
    where
        F: FnMut(&SessionEvent),
    {
        let (theme, model) = validate_request(&request)?;
        let original_image = request.image_reference.clone().unwrap_or_default();

        let tap = Arc::new(OutcomeTap::new(Arc::clone(&self.backend)));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();
        let mut job = TransformJob::activate(
            Arc::clone(&tap) as Arc<dyn TransformBackend>,
            request,
            Arc::new(move |response| {
                // The receiver outlives the job unless `run` was abandoned.
                let _ = done_tx.send(response);
            }),
            self.timing,
        );
        let timeline = job.timeline();
        let mut states = job.subscribe();

        loop {
            let settled = follow_attempt(&mut states, &timeline, &mut observer).await;

            match settled.phase {
                JobPhase::Done => {
                    let response = done_rx.recv().await.ok_or(TransformError::Cancelled)?;
                    let fallback = tap.last_fallback();
                    let attempts = settled.attempt + 1;
                    info!(
                        job_id = %response.job_id,
                        attempts = attempts,
                        fallback = fallback.is_some(),
                        "Transform finished"
                    );
                    return Ok(ResultSummary::new(
                        response,
                        fallback.as_ref(),
                        original_image,
                        theme,
                        model,
                        attempts,
                    ));
                }
                _ => {
                    observer(&SessionEvent::AttemptFailed {
                        attempt: settled.attempt,
                        message: settled.error.clone().unwrap_or_default(),
                    });
                    if settled.attempt >= self.max_retries {
                        job.deactivate().await;
                        return Err(TransformError::JobFailed {
                            attempts: settled.attempt + 1,
                        }
                        .into());
                    }
                    debug!(attempt = settled.attempt, "Retrying failed transform");
                    job.retry().await;
                }
            }
        }
    }
}

/// Forward one attempt's progress to `observer` until it settles.
async fn follow_attempt<F>(
    states: &mut tokio::sync::watch::Receiver<JobState>,
    timeline: &StepTimeline,
    observer: &mut F,
) -> JobState
where
    F: FnMut(&SessionEvent),
{
    let mut reported: Option<(u32, usize)> = None;

    loop {
        let state = states.borrow_and_update().clone();

        if reported.is_none_or(|(attempt, _)| attempt != state.attempt) {
            observer(&SessionEvent::AttemptStarted {
                attempt: state.attempt,
            });
            reported = None;
        }
        if reported.is_none_or(|(_, index)| index != state.step_index)
            && let Some(label) = timeline.label_at(state.step_index)
        {
            observer(&SessionEvent::Step {
                index: state.step_index,
                total: timeline.len(),
                label,
            });
        }
        reported = Some((state.attempt, state.step_index));

        if state.phase.is_terminal() {
            return state;
        }
        if states.changed().await.is_err() {
            // The job owns the sender; a closed channel means it is gone.
            return state;
        }
    }
}

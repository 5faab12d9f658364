//! Transform job lifecycle on tokio's paused clock.
//!
//! Backends are scripted: each call pops the next reply and resolves it after
//! the reply's delay. With the clock paused, `sleep` in the test advances time
//! deterministically, so states can be checked at exact offsets.

use std::collections::VecDeque;
use std::future::pending;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fiterior_client::{
    FallbackReason, TransformBackend, TransformError, TransformOutcome, TransformRequest,
    TransformResponse,
};
use fiterior_orchestrator::{JobPhase, JobState, JobTiming, TransformJob};
use fiterior_utils::error::CONVERSION_FAILED_MESSAGE;
use tokio::time::{Instant, sleep};

enum Reply {
    After(Duration, Result<TransformOutcome, TransformError>),
    Never,
}

#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<TransformRequest>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TransformBackend for ScriptedBackend {
    async fn transform(
        &self,
        request: &TransformRequest,
    ) -> Result<TransformOutcome, TransformError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::After(delay, result)) => {
                sleep(delay).await;
                result
            }
            Some(Reply::Never) | None => pending().await,
        }
    }
}

fn response(job_id: &str, result_url: &str) -> TransformResponse {
    TransformResponse {
        job_id: job_id.to_string(),
        result_url: result_url.to_string(),
    }
}

fn delivered(after_ms: u64, job_id: &str, result_url: &str) -> Reply {
    Reply::After(
        Duration::from_millis(after_ms),
        Ok(TransformOutcome::Delivered(response(job_id, result_url))),
    )
}

fn failing(after_ms: u64) -> Reply {
    Reply::After(
        Duration::from_millis(after_ms),
        Err(TransformError::MalformedResponse {
            endpoint: "http://backend.test".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        }),
    )
}

fn sample_request() -> TransformRequest {
    TransformRequest::new("file://a.jpg", "modern", "gpt-4o")
}

/// Records every callback invocation with the job state seen at that moment.
#[derive(Clone, Default)]
struct Completions(Arc<Mutex<Vec<TransformResponse>>>);

impl Completions {
    fn callback(&self) -> fiterior_orchestrator::CompletionCallback {
        let seen = Arc::clone(&self.0);
        Arc::new(move |response| seen.lock().unwrap().push(response))
    }

    fn all(&self) -> Vec<TransformResponse> {
        self.0.lock().unwrap().clone()
    }
}

fn activate(backend: Arc<ScriptedBackend>, completions: &Completions) -> TransformJob {
    TransformJob::activate(
        backend,
        sample_request(),
        completions.callback(),
        JobTiming::default(),
    )
}

/// Sleep until `ms` after `origin`.
async fn at(origin: Instant, ms: u64) {
    tokio::time::sleep_until(origin + Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn response_jumps_to_final_step_then_completes_after_grace() {
    let backend = ScriptedBackend::new(vec![delivered(2_000, "j1", "https://x/y.png")]);
    let completions = Completions::default();
    let origin = Instant::now();
    let job = activate(backend, &completions);

    assert_eq!(job.state(), JobState { step_index: 0, error: None, attempt: 0, phase: JobPhase::Running });

    at(origin, 1_500).await;
    assert_eq!(job.state().step_index, 1);
    assert_eq!(job.state().phase, JobPhase::Running);

    at(origin, 2_100).await;
    let state = job.state();
    assert_eq!(state.step_index, 3);
    assert_eq!(state.phase, JobPhase::Completing);
    assert!(completions.all().is_empty());

    at(origin, 2_550).await;
    assert!(completions.all().is_empty());

    at(origin, 2_650).await;
    assert_eq!(job.state().phase, JobPhase::Done);
    assert_eq!(completions.all(), vec![response("j1", "https://x/y.png")]);
}

#[tokio::test(start_paused = true)]
async fn fallback_response_is_passed_through() {
    let fallback = TransformOutcome::Fallback {
        response: response("job-1700000000000", "file://a.jpg"),
        reason: FallbackReason::Network("connection refused".to_string()),
    };
    let backend = ScriptedBackend::new(vec![Reply::After(Duration::from_millis(1_600), Ok(fallback))]);
    let completions = Completions::default();
    let job = activate(backend, &completions);

    let settled = job.settled().await;
    assert_eq!(settled.phase, JobPhase::Done);
    assert_eq!(settled.step_index, 3);
    assert_eq!(
        completions.all(),
        vec![response("job-1700000000000", "file://a.jpg")]
    );
}

#[tokio::test(start_paused = true)]
async fn steps_advance_on_schedule_while_backend_is_slow() {
    let backend = ScriptedBackend::new(vec![Reply::Never]);
    let completions = Completions::default();
    let origin = Instant::now();
    let job = activate(backend, &completions);

    for (ms, expected) in [(1_300, 0), (1_500, 1), (2_900, 2), (4_300, 3), (60_000, 3)] {
        at(origin, ms).await;
        assert_eq!(job.state().step_index, expected, "at {ms} ms");
        assert_eq!(job.state().phase, JobPhase::Running);
    }
    assert!(completions.all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn deactivation_suppresses_steps_and_callback() {
    let backend = ScriptedBackend::new(vec![delivered(3_000, "j1", "https://x/y.png")]);
    let completions = Completions::default();
    let origin = Instant::now();
    let mut job = activate(backend, &completions);
    let mut rx = job.subscribe();

    at(origin, 1_500).await;
    assert_eq!(job.state().step_index, 1);
    job.deactivate().await;
    rx.mark_unchanged();

    at(origin, 20_000).await;
    assert_eq!(job.state().step_index, 1);
    assert_eq!(job.state().phase, JobPhase::Running);
    assert!(!rx.has_changed().unwrap());
    assert!(completions.all().is_empty());
    assert!(!job.is_active());
}

#[tokio::test(start_paused = true)]
async fn deactivation_during_grace_suppresses_callback() {
    let backend = ScriptedBackend::new(vec![delivered(500, "j1", "https://x/y.png")]);
    let completions = Completions::default();
    let origin = Instant::now();
    let mut job = activate(backend, &completions);

    at(origin, 800).await;
    assert_eq!(job.state().phase, JobPhase::Completing);
    job.deactivate().await;

    at(origin, 5_000).await;
    assert_eq!(job.state().phase, JobPhase::Completing);
    assert!(completions.all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_job_cancels_the_attempt() {
    let backend = ScriptedBackend::new(vec![delivered(2_000, "j1", "https://x/y.png")]);
    let completions = Completions::default();
    let origin = Instant::now();
    let job = activate(backend, &completions);
    let rx = job.subscribe();

    at(origin, 1_000).await;
    drop(job);

    at(origin, 10_000).await;
    assert!(completions.all().is_empty());
    assert_eq!(rx.borrow().step_index, 0);
}

#[tokio::test(start_paused = true)]
async fn backend_error_fails_with_generic_message_and_freezes_steps() {
    let backend = ScriptedBackend::new(vec![failing(1_500)]);
    let completions = Completions::default();
    let origin = Instant::now();
    let job = activate(backend, &completions);

    at(origin, 1_600).await;
    let state = job.state();
    assert_eq!(state.phase, JobPhase::Failed);
    assert_eq!(state.error.as_deref(), Some(CONVERSION_FAILED_MESSAGE));
    assert_eq!(state.step_index, 1);

    at(origin, 10_000).await;
    assert_eq!(job.state(), state);
    assert!(completions.all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn retry_after_failure_restarts_from_scratch() {
    let backend = ScriptedBackend::new(vec![
        failing(100),
        delivered(1_000, "j2", "https://x/z.png"),
    ]);
    let completions = Completions::default();
    let mut job = activate(Arc::clone(&backend), &completions);

    assert!(job.settled().await.is_failed());

    job.retry().await;
    let state = job.state();
    assert_eq!(state.attempt, 1);
    assert_eq!(state.step_index, 0);
    assert_eq!(state.error, None);
    assert_eq!(state.phase, JobPhase::Running);

    let settled = job.settled().await;
    assert!(settled.is_done());
    assert_eq!(settled.attempt, 1);
    assert_eq!(completions.all(), vec![response("j2", "https://x/z.png")]);

    let requests = backend.requests.lock().unwrap().clone();
    assert_eq!(requests, vec![sample_request(), sample_request()]);
}

#[tokio::test(start_paused = true)]
async fn retry_mid_flight_discards_the_old_attempt() {
    let backend = ScriptedBackend::new(vec![
        delivered(2_000, "stale", "https://x/old.png"),
        delivered(3_000, "fresh", "https://x/new.png"),
    ]);
    let completions = Completions::default();
    let origin = Instant::now();
    let mut job = activate(Arc::clone(&backend), &completions);

    at(origin, 1_500).await;
    assert_eq!(job.state().step_index, 1);
    job.retry().await;
    assert_eq!(job.state().step_index, 0);

    // Old attempt would have resolved at 2000 ms; the new one has not yet.
    at(origin, 2_600).await;
    assert_eq!(job.state().step_index, 0);
    assert_eq!(job.state().phase, JobPhase::Running);

    let settled = job.settled().await;
    assert_eq!(settled.attempt, 1);
    assert_eq!(completions.all(), vec![response("fresh", "https://x/new.png")]);
    assert_eq!(backend.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn retry_after_done_runs_again() {
    let backend = ScriptedBackend::new(vec![
        delivered(100, "j1", "u1"),
        delivered(100, "j2", "u2"),
        delivered(100, "j3", "u3"),
    ]);
    let completions = Completions::default();
    let mut job = activate(backend, &completions);

    let mut attempts = vec![job.settled().await.attempt];
    for _ in 0..2 {
        job.retry().await;
        attempts.push(job.settled().await.attempt);
    }

    assert_eq!(attempts, vec![0, 1, 2]);
    assert_eq!(
        completions.all(),
        vec![response("j1", "u1"), response("j2", "u2"), response("j3", "u3")]
    );
}

#[tokio::test(start_paused = true)]
async fn unchanged_request_does_not_restart() {
    let backend = ScriptedBackend::new(vec![delivered(5_000, "j1", "u1")]);
    let completions = Completions::default();
    let origin = Instant::now();
    let mut job = activate(Arc::clone(&backend), &completions);

    at(origin, 1_500).await;
    assert!(!job.set_request(sample_request()).await);
    assert_eq!(job.state().step_index, 1);
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn changed_request_resets_the_job() {
    let backend = ScriptedBackend::new(vec![
        failing(100),
        delivered(5_000, "never", "u"),
        delivered(200, "j-nordic", "https://x/nordic.png"),
    ]);
    let completions = Completions::default();
    let mut job = activate(Arc::clone(&backend), &completions);

    assert!(job.settled().await.is_failed());
    job.retry().await;
    assert_eq!(job.state().attempt, 1);

    let nordic = TransformRequest::new("file://a.jpg", "nordic", "gpt-4o");
    assert!(job.set_request(nordic.clone()).await);
    assert_eq!(job.state().attempt, 0);
    assert_eq!(job.request(), &nordic);

    let settled = job.settled().await;
    assert!(settled.is_done());
    assert_eq!(completions.all(), vec![response("j-nordic", "https://x/nordic.png")]);
    assert_eq!(backend.requests.lock().unwrap().last(), Some(&nordic));
}

#[tokio::test(start_paused = true)]
async fn custom_timing_is_honoured() {
    let backend = ScriptedBackend::new(vec![delivered(250, "j1", "u1")]);
    let completions = Completions::default();
    let origin = Instant::now();
    let job = TransformJob::activate(
        backend,
        sample_request(),
        completions.callback(),
        JobTiming {
            step_interval: Duration::from_millis(100),
            grace_delay: Duration::from_millis(50),
        },
    );

    at(origin, 150).await;
    assert_eq!(job.state().step_index, 1);
    at(origin, 260).await;
    assert_eq!(job.state().phase, JobPhase::Completing);
    at(origin, 310).await;
    assert_eq!(job.state().phase, JobPhase::Done);
    assert_eq!(completions.all().len(), 1);
    assert_eq!(job.timeline().interval(), Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn settled_without_live_attempt_returns_immediately() {
    let backend = ScriptedBackend::new(vec![Reply::Never]);
    let completions = Completions::default();
    let mut job = activate(backend, &completions);

    job.deactivate().await;
    job.deactivate().await;
    let state = job.settled().await;
    assert_eq!(state.phase, JobPhase::Running);
}

struct PanickingBackend;

#[async_trait]
impl TransformBackend for PanickingBackend {
    async fn transform(
        &self,
        _request: &TransformRequest,
    ) -> Result<TransformOutcome, TransformError> {
        sleep(Duration::from_millis(100)).await;
        panic!("backend blew up");
    }
}

#[tokio::test(start_paused = true)]
async fn backend_panic_fails_with_generic_message() {
    let completions = Completions::default();
    let job = TransformJob::activate(
        Arc::new(PanickingBackend),
        sample_request(),
        completions.callback(),
        JobTiming::default(),
    );

    let settled = tokio::time::timeout(Duration::from_secs(600), job.settled())
        .await
        .expect("job should settle after a backend panic");
    assert_eq!(settled.phase, JobPhase::Failed);
    assert_eq!(settled.error.as_deref(), Some(CONVERSION_FAILED_MESSAGE));
    assert_eq!(settled.step_index, 0);
    assert!(completions.all().is_empty());
}

#[tokio::test(start_paused = true)]
async fn retry_after_backend_panic_runs_again() {
    let completions = Completions::default();
    let mut job = TransformJob::activate(
        Arc::new(PanickingBackend),
        sample_request(),
        completions.callback(),
        JobTiming::default(),
    );
    assert!(job.settled().await.is_failed());

    job.retry().await;
    let state = job.state();
    assert_eq!(state.phase, JobPhase::Running);
    assert_eq!(state.attempt, 1);
    assert_eq!(state.error, None);
    assert!(job.settled().await.is_failed());
}

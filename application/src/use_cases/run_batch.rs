//! Run Batch use case
//!
//! Resolves every identifier of an [`ExtractedSet`] against the registry,
//! strictly one request at a time.
//!
//! # Per-identifier state machine
//!
//! ```text
//! Pending ──▶ Attempting ──▶ Success
//!                 │  ▲
//!   429 / network │  │ after cooldown
//!                 ▼  │
//!              Retrying
//!                 │
//!                 └──▶ Exhausted   (attempt budget spent)
//!
//! Attempting ──(other non-2xx)──▶ Rejected
//! ```
//!
//! Every terminal state yields exactly one [`OrganisationRecord`], so the
//! output always has one record per identifier, in identifier order.

use crate::config::FetchPolicy;
use crate::ports::progress::{Backoff, BackoffReason, BatchProgressNotifier, NoProgress};
use crate::ports::registry_gateway::RegistryGateway;
use crate::ports::sleeper::{Sleeper, TokioSleeper};
use ror_domain::{
    BatchResult, ExtractedSet, FailureReason, FetchOutcome, OrganisationRecord, RorId,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can abort a batch
///
/// Per-identifier failures never show up here; they become placeholder
/// records instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunBatchError {
    #[error("Batch cancelled")]
    Cancelled,
}

/// Lifecycle of a single identifier inside the batch
#[derive(Debug)]
enum AttemptState {
    Pending,
    Attempting { attempt: u32 },
    Retrying { attempt: u32, reason: BackoffReason },
    Success(OrganisationRecord),
    Exhausted(OrganisationRecord),
    Rejected(OrganisationRecord),
}

/// Outcome of driving one identifier to a terminal state
struct Resolved {
    record: OrganisationRecord,
    retried: bool,
}

/// Use case for resolving a whole identifier set
pub struct RunBatchUseCase<G: RegistryGateway + 'static> {
    gateway: Arc<G>,
    sleeper: Arc<dyn Sleeper>,
    policy: FetchPolicy,
    cancellation: Option<CancellationToken>,
}

impl<G: RegistryGateway + 'static> RunBatchUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            sleeper: Arc::new(TokioSleeper),
            policy: FetchPolicy::default(),
            cancellation: None,
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Abandon the batch when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, ids: &ExtractedSet) -> Result<BatchResult, RunBatchError> {
        self.execute_with_progress(ids, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        ids: &ExtractedSet,
        progress: &dyn BatchProgressNotifier,
    ) -> Result<BatchResult, RunBatchError> {
        let total = ids.len();
        info!("Starting batch lookup of {} identifier(s)", total);
        progress.on_batch_start(total);

        if total > self.policy.large_batch_threshold {
            progress.on_notice(&format!(
                "Processing {} IDs. Note: ROR API allows 2000 requests per 5 minutes.",
                total
            ));
        }

        let mut records = Vec::with_capacity(total);

        for (index, id) in ids.iter().enumerate() {
            self.check_cancelled()?;

            let resolved = self.resolve_one(index, total, id, progress).await?;
            progress.on_item_complete(index, &resolved.record);
            records.push(resolved.record);

            // Only pace after a clean first attempt; backoff already spaced things out
            if !resolved.retried && index + 1 < total {
                self.pause(self.policy.pacing_delay).await?;
            }
        }

        let result = BatchResult::new(records);
        info!(
            "Batch complete: {} succeeded, {} failed",
            result.summary.succeeded, result.summary.failed
        );
        progress.on_batch_complete(&result.summary);
        Ok(result)
    }

    /// Drive one identifier through the state machine
    async fn resolve_one(
        &self,
        index: usize,
        total: usize,
        id: &RorId,
        progress: &dyn BatchProgressNotifier,
    ) -> Result<Resolved, RunBatchError> {
        let mut state = AttemptState::Pending;
        let mut retried = false;

        loop {
            state = match state {
                AttemptState::Pending => AttemptState::Attempting { attempt: 1 },

                AttemptState::Attempting { attempt } => {
                    progress.on_attempt(index, total, id, attempt);
                    debug!("Resolving {} (attempt {})", id, attempt);
                    let outcome = self.request(id).await?;
                    self.next_state(id, attempt, outcome)
                }

                AttemptState::Retrying { attempt, reason } => {
                    retried = true;
                    self.backoff(id, attempt, reason, progress).await?;
                    AttemptState::Attempting {
                        attempt: attempt + 1,
                    }
                }

                AttemptState::Success(record) => {
                    return Ok(Resolved { record, retried });
                }

                AttemptState::Exhausted(record) | AttemptState::Rejected(record) => {
                    warn!("Lookup for {} failed: {}", id, record.name);
                    return Ok(Resolved { record, retried });
                }
            };
        }
    }

    fn next_state(&self, id: &RorId, attempt: u32, outcome: FetchOutcome) -> AttemptState {
        match outcome {
            FetchOutcome::Success(record) => AttemptState::Success(record),

            FetchOutcome::HttpError { status, message } => {
                AttemptState::Rejected(OrganisationRecord::placeholder(
                    id.clone(),
                    FailureReason::Upstream { status, message },
                ))
            }

            FetchOutcome::RateLimited if attempt < self.policy.max_attempts => {
                AttemptState::Retrying {
                    attempt,
                    reason: BackoffReason::RateLimited,
                }
            }

            FetchOutcome::NetworkError(message) if attempt < self.policy.max_attempts => {
                debug!("Network error for {}: {}", id, message);
                AttemptState::Retrying {
                    attempt,
                    reason: BackoffReason::NetworkError,
                }
            }

            FetchOutcome::RateLimited => AttemptState::Exhausted(OrganisationRecord::placeholder(
                id.clone(),
                FailureReason::RateLimitExceeded,
            )),

            FetchOutcome::NetworkError(message) => AttemptState::Exhausted(
                OrganisationRecord::placeholder(id.clone(), FailureReason::NetworkError { message }),
            ),
        }
    }

    /// Wait out a backoff, reporting a countdown as it goes
    async fn backoff(
        &self,
        id: &RorId,
        attempt: u32,
        reason: BackoffReason,
        progress: &dyn BatchProgressNotifier,
    ) -> Result<(), RunBatchError> {
        let wait = match reason {
            BackoffReason::RateLimited => self.policy.rate_limit_cooldown,
            BackoffReason::NetworkError => self.policy.network_retry_delay,
        };
        info!(
            "{} for {}; waiting {:?} before retry {}/{}",
            reason, id, wait, attempt, self.policy.max_attempts
        );

        let mut backoff = Backoff {
            id: id.clone(),
            reason,
            attempt,
            max_attempts: self.policy.max_attempts,
            remaining: wait,
        };
        progress.on_backoff_start(&backoff);

        let tick = if self.policy.countdown_tick.is_zero() {
            wait
        } else {
            self.policy.countdown_tick
        };

        while !backoff.remaining.is_zero() {
            let step = tick.min(backoff.remaining);
            self.pause(step).await?;
            backoff.remaining -= step;
            progress.on_backoff_tick(&backoff);
        }
        Ok(())
    }

    async fn request(&self, id: &RorId) -> Result<FetchOutcome, RunBatchError> {
        match &self.cancellation {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(RunBatchError::Cancelled),
                outcome = self.gateway.resolve(id) => Ok(outcome),
            },
            None => Ok(self.gateway.resolve(id).await),
        }
    }

    async fn pause(&self, duration: Duration) -> Result<(), RunBatchError> {
        if duration.is_zero() {
            return Ok(());
        }
        match &self.cancellation {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(RunBatchError::Cancelled),
                _ = self.sleeper.sleep(duration) => Ok(()),
            },
            None => {
                self.sleeper.sleep(duration).await;
                Ok(())
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), RunBatchError> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => Err(RunBatchError::Cancelled),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ror_domain::{BatchSummary, NOT_AVAILABLE};
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    /// Gateway that replays scripted outcomes per identifier
    struct ScriptedGateway {
        scripts: Mutex<HashMap<String, VecDeque<FetchOutcome>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new() -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn script(self, id: &str, outcomes: Vec<FetchOutcome>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(id.to_string(), VecDeque::from(outcomes));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn calls_for(&self, id: &str) -> usize {
            self.calls().iter().filter(|c| c.as_str() == id).count()
        }
    }

    #[async_trait]
    impl RegistryGateway for ScriptedGateway {
        async fn resolve(&self, id: &RorId) -> FetchOutcome {
            self.calls.lock().unwrap().push(id.to_string());
            self.scripts
                .lock()
                .unwrap()
                .get_mut(id.as_str())
                .and_then(|q| q.pop_front())
                .unwrap_or_else(|| FetchOutcome::Success(named(id.as_str(), "Default Org")))
        }
    }

    /// Sleeper that records requested durations instead of waiting
    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn total(&self) -> Duration {
            self.sleeps.lock().unwrap().iter().sum()
        }

        fn count_of(&self, d: Duration) -> usize {
            self.sleeps.lock().unwrap().iter().filter(|s| **s == d).count()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    /// Progress sink that keeps a log of events
    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl RecordingProgress {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl BatchProgressNotifier for RecordingProgress {
        fn on_batch_start(&self, total: usize) {
            self.events.lock().unwrap().push(format!("start {}", total));
        }
        fn on_attempt(&self, index: usize, total: usize, id: &RorId, attempt: u32) {
            self.events
                .lock()
                .unwrap()
                .push(format!("attempt {}/{} {} #{}", index + 1, total, id, attempt));
        }
        fn on_item_complete(&self, index: usize, record: &OrganisationRecord) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {} {}", index + 1, record.is_placeholder()));
        }
        fn on_batch_complete(&self, summary: &BatchSummary) {
            self.events
                .lock()
                .unwrap()
                .push(format!("complete {}/{}", summary.succeeded, summary.failed));
        }
        fn on_backoff_start(&self, backoff: &Backoff) {
            self.events.lock().unwrap().push(format!(
                "backoff {} {}/{} {}s",
                backoff.reason,
                backoff.attempt,
                backoff.max_attempts,
                backoff.remaining.as_secs()
            ));
        }
        fn on_notice(&self, message: &str) {
            self.events.lock().unwrap().push(format!("notice {}", message));
        }
    }

    fn named(id: &str, name: &str) -> OrganisationRecord {
        let mut record = OrganisationRecord::unavailable(RorId::parse(id).unwrap());
        record.name = name.to_string();
        record
    }

    fn set(ids: &[&str]) -> ExtractedSet {
        ExtractedSet::new(ids.iter().map(|s| RorId::parse(s).unwrap()))
    }

    fn use_case(
        gateway: ScriptedGateway,
    ) -> (
        RunBatchUseCase<ScriptedGateway>,
        Arc<ScriptedGateway>,
        Arc<RecordingSleeper>,
    ) {
        let gateway = Arc::new(gateway);
        let sleeper = Arc::new(RecordingSleeper::default());
        let uc = RunBatchUseCase::new(Arc::clone(&gateway)).with_sleeper(sleeper.clone());
        (uc, gateway, sleeper)
    }

    fn http(status: u16, message: &str) -> FetchOutcome {
        FetchOutcome::HttpError {
            status,
            message: message.to_string(),
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_all_success_preserves_order() {
        let gateway = ScriptedGateway::new()
            .script("03vek6s52", vec![FetchOutcome::Success(named("03vek6s52", "Harvard"))])
            .script("00hx57361", vec![FetchOutcome::Success(named("00hx57361", "Princeton"))]);
        let (uc, gateway, _) = use_case(gateway);

        let result = uc.execute(&set(&["03vek6s52", "00hx57361"])).await.unwrap();

        let names: Vec<_> = result.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Princeton", "Harvard"]);
        assert_eq!(gateway.calls(), vec!["00hx57361", "03vek6s52"]);
        assert_eq!(result.summary.succeeded, 2);
        assert_eq!(result.summary.failed, 0);
    }

    #[tokio::test]
    async fn test_pacing_between_clean_attempts_only() {
        let (uc, _, sleeper) = use_case(ScriptedGateway::new());

        uc.execute(&set(&["00hx57361", "03vek6s52", "042nb2s44"]))
            .await
            .unwrap();

        // two gaps for three ids, none after the last
        assert_eq!(sleeper.count_of(Duration::from_millis(200)), 2);
        assert_eq!(sleeper.total(), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn test_rate_limit_retries_then_succeeds() {
        let gateway = ScriptedGateway::new().script(
            "03vek6s52",
            vec![
                FetchOutcome::RateLimited,
                FetchOutcome::Success(named("03vek6s52", "Harvard")),
            ],
        );
        let (uc, gateway, sleeper) = use_case(gateway);
        let progress = RecordingProgress::default();

        let result = uc
            .execute_with_progress(&set(&["03vek6s52"]), &progress)
            .await
            .unwrap();

        assert_eq!(result.records[0].name, "Harvard");
        assert_eq!(gateway.calls_for("03vek6s52"), 2);
        assert_eq!(sleeper.total(), Duration::from_secs(300));
        // countdown ticks once per second
        assert_eq!(sleeper.count_of(Duration::from_secs(1)), 300);
        assert!(
            progress
                .events()
                .contains(&"backoff Rate limit exceeded 1/3 300s".to_string())
        );
    }

    #[tokio::test]
    async fn test_rate_limit_exhaustion_yields_placeholder() {
        let gateway = ScriptedGateway::new().script(
            "03vek6s52",
            vec![
                FetchOutcome::RateLimited,
                FetchOutcome::RateLimited,
                FetchOutcome::RateLimited,
                FetchOutcome::Success(named("03vek6s52", "never reached")),
            ],
        );
        let (uc, gateway, sleeper) = use_case(gateway);

        let result = uc.execute(&set(&["03vek6s52"])).await.unwrap();

        assert_eq!(gateway.calls_for("03vek6s52"), 3);
        assert_eq!(sleeper.total(), Duration::from_secs(600));
        let record = &result.records[0];
        assert_eq!(record.name, "Rate limit exceeded - max retries reached");
        assert_eq!(record.failure, Some(FailureReason::RateLimitExceeded));
        assert_eq!(result.summary.failed, 1);
    }

    #[tokio::test]
    async fn test_network_error_retries_with_short_delay() {
        let gateway = ScriptedGateway::new().script(
            "03vek6s52",
            vec![
                FetchOutcome::NetworkError("connection reset".to_string()),
                FetchOutcome::NetworkError("connection reset".to_string()),
                FetchOutcome::NetworkError("connection reset".to_string()),
            ],
        );
        let (uc, gateway, sleeper) = use_case(gateway);

        let result = uc.execute(&set(&["03vek6s52"])).await.unwrap();

        assert_eq!(gateway.calls_for("03vek6s52"), 3);
        assert_eq!(sleeper.total(), Duration::from_secs(20));
        assert_eq!(result.records[0].name, "Network error - max retries reached");
        assert_eq!(
            result.records[0].failure,
            Some(FailureReason::NetworkError {
                message: "connection reset".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_http_error_is_never_retried() {
        let gateway = ScriptedGateway::new()
            .script("03vek6s52", vec![http(404, "Not Found")])
            .script("00hx57361", vec![http(500, "Internal Server Error")]);
        let (uc, gateway, sleeper) = use_case(gateway);

        let result = uc.execute(&set(&["03vek6s52", "00hx57361"])).await.unwrap();

        assert_eq!(gateway.calls_for("03vek6s52"), 1);
        assert_eq!(gateway.calls_for("00hx57361"), 1);
        assert_eq!(result.records[0].name, "Error 500: Internal Server Error");
        assert_eq!(result.records[1].name, "Error 404: Not Found");
        // only the pacing gap, no backoff
        assert_eq!(sleeper.total(), Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_record_count_matches_ids_when_everything_fails() {
        let ids = ["00hx57361", "03vek6s52", "042nb2s44", "052gg0110"];
        let gateway = ids.iter().fold(ScriptedGateway::new(), |g, id| {
            g.script(id, vec![FetchOutcome::RateLimited; 3])
        });
        let (uc, _, _) = use_case(gateway);

        let result = uc.execute(&set(&ids)).await.unwrap();

        assert_eq!(result.records.len(), ids.len());
        assert!(result.records.iter().all(|r| r.is_placeholder()));
        assert_eq!(result.summary.failed, 4);
        let record_ids: Vec<_> = result.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(record_ids, ids.to_vec());
    }

    #[tokio::test]
    async fn test_no_pacing_after_retried_item() {
        let gateway = ScriptedGateway::new().script(
            "00hx57361",
            vec![FetchOutcome::NetworkError("timeout".to_string())],
        );
        let (uc, _, sleeper) = use_case(gateway);

        uc.execute(&set(&["00hx57361", "03vek6s52"])).await.unwrap();

        assert_eq!(sleeper.count_of(Duration::from_millis(200)), 0);
        assert_eq!(sleeper.total(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_progress_events_in_order() {
        let gateway =
            ScriptedGateway::new().script("03vek6s52", vec![http(404, "Not Found")]);
        let (uc, _, _) = use_case(gateway);
        let progress = RecordingProgress::default();

        uc.execute_with_progress(&set(&["00hx57361", "03vek6s52"]), &progress)
            .await
            .unwrap();

        assert_eq!(
            progress.events(),
            vec![
                "start 2",
                "attempt 1/2 00hx57361 #1",
                "done 1 false",
                "attempt 2/2 03vek6s52 #1",
                "done 2 true",
                "complete 1/1",
            ]
        );
    }

    #[tokio::test]
    async fn test_large_batch_notice() {
        let (uc, _, _) = use_case(ScriptedGateway::new());
        let uc = uc.with_policy(FetchPolicy::default().with_large_batch_threshold(1));
        let progress = RecordingProgress::default();

        uc.execute_with_progress(&set(&["00hx57361", "03vek6s52"]), &progress)
            .await
            .unwrap();

        assert!(progress.events().iter().any(|e| e.starts_with("notice Processing 2 IDs")));
    }

    #[tokio::test]
    async fn test_custom_policy_attempts() {
        let gateway = ScriptedGateway::new()
            .script("03vek6s52", vec![FetchOutcome::RateLimited; 5]);
        let (uc, gateway, sleeper) = use_case(gateway);
        let uc = uc.with_policy(
            FetchPolicy::default()
                .with_max_attempts(1)
                .with_rate_limit_cooldown(Duration::from_secs(2)),
        );

        let result = uc.execute(&set(&["03vek6s52"])).await.unwrap();

        assert_eq!(gateway.calls_for("03vek6s52"), 1);
        assert_eq!(sleeper.total(), Duration::ZERO);
        assert_eq!(result.records[0].country, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let (uc, gateway, _) = use_case(ScriptedGateway::new());
        let token = CancellationToken::new();
        token.cancel();
        let uc = uc.with_cancellation(token);

        let err = uc.execute(&set(&["03vek6s52"])).await.unwrap_err();

        assert_eq!(err, RunBatchError::Cancelled);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_set_completes_immediately() {
        let (uc, gateway, sleeper) = use_case(ScriptedGateway::new());

        let result = uc.execute(&ExtractedSet::new(Vec::new())).await.unwrap();

        assert!(result.records.is_empty());
        assert!(gateway.calls().is_empty());
        assert_eq!(sleeper.total(), Duration::ZERO);
    }
}

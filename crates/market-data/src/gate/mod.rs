//! Priority-ordered, admission-controlled request queue.
//!
//! Every vendor call goes through a [`RequestGate`]. Requests wait in a
//! priority queue and are admitted one at a time by a single drain loop,
//! subject to three policies evaluated in order:
//!
//! 1. **Daily quota** - once the daily budget is spent, requests fail
//!    immediately with a quota error until the next local-midnight reset.
//! 2. **Sliding window** - at most `max_per_window` admissions within the
//!    trailing window.
//! 3. **Minimum spacing** - consecutive admissions are at least
//!    `min_spacing` apart.
//!
//! Deferred requests wait via bounded polling; exceeding the polling ceiling
//! settles them with a timeout error. Admitted actions run to completion
//! before the next admission check, so vendor calls are strictly serialized.
//! The gate never retries; outcomes are settled verbatim.
//!
//! The daily counter survives restarts through a [`KvStore`]; the sliding
//! window is transient, which is acceptable because it is only a minute
//! wide. The daily reset is lazy: it happens on the first check past the
//! boundary, not at the boundary instant.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use futures::future::BoxFuture;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::time::{sleep, Duration, Instant};

use crate::cache::KvStore;
use crate::errors::MarketDataError;

/// Durable key for the persisted daily counter.
const QUOTA_KEY: &str = "mlens_quota";

/// Relative urgency of a queued request. Quotes jump the line; fundamentals
/// and search yield to everything else.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Priority {
    Low,
    Normal,
    High,
}

/// Admission policy configuration.
///
/// The defaults match the vendor's free tier: 5 calls per trailing minute,
/// 12.5 seconds between calls, 500 calls per day.
#[derive(Clone, Debug)]
pub struct GateConfig {
    /// Maximum admissions within the trailing window.
    pub max_per_window: usize,
    /// Width of the sliding window.
    pub window: Duration,
    /// Minimum gap between consecutive admissions.
    pub min_spacing: Duration,
    /// Daily admission budget.
    pub daily_max: u32,
    /// Floor for each deferred-admission sleep.
    pub poll_interval: Duration,
    /// Ceiling on deferred-admission sleeps per request; exceeding it fails
    /// the request with a timeout.
    pub max_admission_polls: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_per_window: 5,
            window: Duration::from_secs(60),
            min_spacing: Duration::from_millis(12_500),
            daily_max: 500,
            poll_interval: Duration::from_millis(500),
            max_admission_polls: 240,
        }
    }
}

/// Point-in-time gate snapshot for observability.
///
/// Reading the status prunes the sliding window and applies the lazy daily
/// reset, matching the read-time-expiry pattern used by the cache.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateStatus {
    pub queue_length: usize,
    pub daily_remaining: u32,
    pub recent_window_count: usize,
    pub next_reset_at: DateTime<Local>,
}

/// Durable form of the daily counter.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedQuota {
    daily_count: u32,
    daily_reset_at: DateTime<Local>,
}

/// A queued action, type-erased so one queue serves every resource type.
/// The job is invoked exactly once with the admission outcome; on an
/// admission failure it settles the caller's future without running the
/// underlying action.
type Job = Box<dyn FnOnce(Result<(), MarketDataError>) -> BoxFuture<'static, ()> + Send>;

struct PendingRequest {
    id: u64,
    priority: Priority,
    enqueued_at: Instant,
    job: Job,
}

struct GateState {
    queue: VecDeque<PendingRequest>,
    /// Admission timestamps within roughly the trailing window, oldest first.
    recent: Vec<Instant>,
    last_admitted: Option<Instant>,
    daily_count: u32,
    daily_reset_at: DateTime<Local>,
    draining: bool,
    next_id: u64,
}

enum Admission {
    Admit,
    Defer(Duration),
    Exhausted { resets_at: DateTime<Local> },
}

/// Process-wide rate gate. Construct once and share via `Arc`.
pub struct RequestGate {
    config: GateConfig,
    state: Mutex<GateState>,
    store: Arc<dyn KvStore>,
}

impl RequestGate {
    /// Create a gate, restoring the persisted daily counter when the store
    /// has a fresh snapshot. A snapshot whose reset time has passed counts
    /// as a fresh day.
    pub fn new(config: GateConfig, store: Arc<dyn KvStore>) -> Arc<Self> {
        let now = Local::now();
        let (daily_count, daily_reset_at) = match load_quota(store.as_ref()) {
            Some(quota) if now < quota.daily_reset_at => {
                debug!(
                    "restored daily counter: {} used, resets at {}",
                    quota.daily_count, quota.daily_reset_at
                );
                (quota.daily_count, quota.daily_reset_at)
            }
            Some(_) => (0, next_local_midnight(now)),
            None => (0, next_local_midnight(now)),
        };

        let gate = Arc::new(Self {
            config,
            state: Mutex::new(GateState {
                queue: VecDeque::new(),
                recent: Vec::new(),
                last_admitted: None,
                daily_count,
                daily_reset_at,
                draining: false,
                next_id: 0,
            }),
            store,
        });
        gate.persist_quota(daily_count, daily_reset_at);
        gate
    }

    /// Queue `action` behind the admission policy and await its outcome.
    ///
    /// The outcome is the action's own result, or the admission failure
    /// (quota exhausted, admission timeout) when the action never ran. No
    /// retry happens here in either case.
    pub async fn run<T, F, Fut>(
        self: Arc<Self>,
        priority: Priority,
        action: F,
    ) -> Result<T, MarketDataError>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T, MarketDataError>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel::<Result<T, MarketDataError>>();
        let job: Job = Box::new(move |admission| {
            Box::pin(async move {
                let outcome = match admission {
                    Ok(()) => action().await,
                    Err(e) => Err(e),
                };
                // The receiver may have been dropped; nothing to do then.
                let _ = tx.send(outcome);
            })
        });

        self.push(priority, job);
        Self::ensure_draining(&self);

        rx.await.unwrap_or(Err(MarketDataError::Cancelled))
    }

    /// Point-in-time snapshot of queue depth and remaining budgets.
    pub fn status(&self) -> GateStatus {
        let now = Instant::now();
        let mut state = self.lock_state();
        self.roll_daily_window(&mut state);
        prune_window(&mut state.recent, now, self.config.window);

        GateStatus {
            queue_length: state.queue.len(),
            daily_remaining: self.config.daily_max.saturating_sub(state.daily_count),
            recent_window_count: state.recent.len(),
            next_reset_at: state.daily_reset_at,
        }
    }

    /// Traffic-independent daily rollover check, for periodic schedulers.
    /// The reset itself stays lazy: whoever checks first past the boundary
    /// performs it.
    pub fn roll_daily_if_due(&self) {
        let mut state = self.lock_state();
        self.roll_daily_window(&mut state);
    }

    /// Lock the gate state, recovering from poison if necessary. Worst case
    /// after recovery is a slightly conservative admission decision.
    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("request gate state mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn push(&self, priority: Priority, job: Job) {
        let mut state = self.lock_state();
        let id = state.next_id;
        state.next_id += 1;

        let request = PendingRequest {
            id,
            priority,
            enqueued_at: Instant::now(),
            job,
        };

        // Stable insert: before the first queued request of strictly lower
        // priority. Equal priorities keep arrival order.
        let at = state
            .queue
            .iter()
            .position(|queued| queued.priority < priority)
            .unwrap_or(state.queue.len());
        state.queue.insert(at, request);

        debug!(
            "queued request #{} at {:?} (depth {})",
            id,
            priority,
            state.queue.len()
        );
    }

    /// Start the drain loop unless one is already running. Exactly one loop
    /// is active at a time; enqueues during a drain are picked up by the
    /// running loop.
    fn ensure_draining(gate: &Arc<Self>) {
        {
            let mut state = gate.lock_state();
            if state.draining || state.queue.is_empty() {
                return;
            }
            state.draining = true;
        }

        let gate = Arc::clone(gate);
        tokio::spawn(async move { gate.drain().await });
    }

    async fn drain(&self) {
        loop {
            let request = {
                let mut state = self.lock_state();
                match state.queue.pop_front() {
                    Some(request) => request,
                    None => {
                        state.draining = false;
                        return;
                    }
                }
            };

            let admission = self.wait_for_admission().await;
            match &admission {
                Ok(()) => {
                    self.record_admission();
                    debug!(
                        "admitted request #{} after {:?} in queue",
                        request.id,
                        request.enqueued_at.elapsed()
                    );
                }
                Err(e) => warn!("request #{} rejected before execution: {}", request.id, e),
            }

            (request.job)(admission).await;
        }
    }

    /// Block until the policy admits the next call, with a bounded number of
    /// deferral sleeps.
    async fn wait_for_admission(&self) -> Result<(), MarketDataError> {
        let mut polls: u32 = 0;
        loop {
            match self.check_admission() {
                Admission::Admit => return Ok(()),
                Admission::Exhausted { resets_at } => {
                    return Err(MarketDataError::QuotaExhausted { resets_at })
                }
                Admission::Defer(wait) => {
                    if polls >= self.config.max_admission_polls {
                        return Err(MarketDataError::AdmissionTimeout);
                    }
                    polls += 1;
                    sleep(wait.max(self.config.poll_interval)).await;
                }
            }
        }
    }

    /// Evaluate the admission policy: daily quota, then sliding window, then
    /// minimum spacing.
    fn check_admission(&self) -> Admission {
        let now = Instant::now();
        let mut state = self.lock_state();
        self.roll_daily_window(&mut state);

        if state.daily_count >= self.config.daily_max {
            return Admission::Exhausted {
                resets_at: state.daily_reset_at,
            };
        }

        prune_window(&mut state.recent, now, self.config.window);
        if state.recent.len() >= self.config.max_per_window {
            if let Some(oldest) = state.recent.first() {
                let reopens = (*oldest + self.config.window).saturating_duration_since(now);
                return Admission::Defer(reopens);
            }
        }

        if let Some(last) = state.last_admitted {
            let since = now.saturating_duration_since(last);
            if since < self.config.min_spacing {
                return Admission::Defer(self.config.min_spacing - since);
            }
        }

        Admission::Admit
    }

    /// Record an admission: window timestamp, spacing anchor, daily counter
    /// (persisted best-effort).
    fn record_admission(&self) {
        let now = Instant::now();
        let (count, reset_at) = {
            let mut state = self.lock_state();
            state.recent.push(now);
            state.last_admitted = Some(now);
            state.daily_count += 1;
            (state.daily_count, state.daily_reset_at)
        };
        self.persist_quota(count, reset_at);
    }

    /// Lazy daily rollover: whoever checks first past the boundary resets
    /// the counter and computes the next boundary.
    fn roll_daily_window(&self, state: &mut GateState) {
        let now = Local::now();
        if now < state.daily_reset_at {
            return;
        }

        info!(
            "daily quota window rolled over ({} calls used)",
            state.daily_count
        );
        state.daily_count = 0;
        state.daily_reset_at = next_local_midnight(now);

        let (count, reset_at) = (state.daily_count, state.daily_reset_at);
        self.persist_quota(count, reset_at);
    }

    /// Best-effort write of the daily counter; a failing store only costs
    /// restart persistence.
    fn persist_quota(&self, daily_count: u32, daily_reset_at: DateTime<Local>) {
        let snapshot = PersistedQuota {
            daily_count,
            daily_reset_at,
        };
        match serde_json::to_string(&snapshot) {
            Ok(raw) => {
                if let Err(e) = self.store.set(QUOTA_KEY, &raw) {
                    warn!("failed to persist quota state: {}", e);
                }
            }
            Err(e) => warn!("failed to encode quota state: {}", e),
        }
    }
}

/// Drop window timestamps older than the trailing window.
fn prune_window(recent: &mut Vec<Instant>, now: Instant, window: Duration) {
    if let Some(horizon) = now.checked_sub(window) {
        recent.retain(|t| *t > horizon);
    }
}

fn load_quota(store: &dyn KvStore) -> Option<PersistedQuota> {
    let raw = store.get(QUOTA_KEY).ok()??;
    match serde_json::from_str(&raw) {
        Ok(quota) => Some(quota),
        Err(e) => {
            warn!("ignoring unreadable quota snapshot: {}", e);
            None
        }
    }
}

/// The next local midnight after `now`. Skipped or ambiguous local midnights
/// (DST transitions) fall back to a plain +24h boundary.
fn next_local_midnight(now: DateTime<Local>) -> DateTime<Local> {
    let tomorrow = (now.date_naive() + Days::new(1)).and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&tomorrow)
        .earliest()
        .unwrap_or_else(|| now + chrono::Duration::days(1))
}

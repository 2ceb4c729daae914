//! Consecutive-failure circuit breaker
//!
//! The breaker has two implicit regions rather than a named state machine:
//!
//! ```text
//! failures == 0 or failures < threshold        -> closed, every call runs
//! failures >= threshold (deficit = f - t >= 0) -> open until
//!                                                 last_attempt + base * 2^deficit
//! ```
//!
//! Once the window elapses any number of callers are admitted at once; there
//! is no single-probe gate. A success anywhere resets the counter to zero.

use crate::{
    backoff::Backoff, builder::BreakerBuilder, callbacks::Callbacks, circuit::Circuit,
    errors::BreakerError,
};
use parking_lot::RwLock;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Breaker configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Consecutive failures tolerated before the circuit opens
    pub failure_threshold: u32,

    /// Backoff window at the threshold; doubles per failure beyond it
    pub base_window: Duration,

    /// Upper bound on a single backoff window (None = uncapped)
    pub max_window: Option<Duration>,

    /// Jitter factor for backoff windows (0.0 = no jitter, 1.0 = full jitter)
    /// Uses chrono-machines formula: window * (1 - jitter + rand * jitter)
    pub jitter_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            base_window: Duration::from_secs(1),
            max_window: None,
            jitter_factor: 0.0,
        }
    }
}

impl Config {
    pub(crate) fn backoff(&self) -> Backoff {
        Backoff {
            base: self.base_window,
            max: self.max_window,
            jitter_factor: self.jitter_factor,
        }
    }
}

/// Snapshot of the breaker's shared state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerState {
    /// Failed calls since the last success
    pub consecutive_failures: u32,
    /// Completion time of the last call that actually ran
    pub last_attempt: Instant,
    /// Fixed at construction
    pub failure_threshold: u32,
    /// Backoff window rolled when the last failure was recorded,
    /// `None` in the closed region
    pub window: Option<Duration>,
}

impl BreakerState {
    fn new(failure_threshold: u32) -> Self {
        Self {
            consecutive_failures: 0,
            last_attempt: Instant::now(),
            failure_threshold,
            window: None,
        }
    }

    /// Earliest instant a call is admitted again, `None` in the closed region
    ///
    /// The outer `Option` is the region; the inner one is `None` when the
    /// window reaches past what `Instant` can represent.
    fn retry_at(&self) -> Option<Option<Instant>> {
        let window = self.window?;
        Some(self.last_attempt.checked_add(window))
    }

    /// Failures beyond the threshold, `None` while in the closed region
    ///
    /// With no failures recorded the breaker is closed even when the
    /// threshold is zero.
    pub fn deficit(&self) -> Option<u32> {
        if self.consecutive_failures == 0 {
            return None;
        }
        self.consecutive_failures.checked_sub(self.failure_threshold)
    }
}

/// Circuit breaker wrapping a [`Circuit`]
///
/// Share it across tasks behind an `Arc`; all methods take `&self`.
pub struct Breaker<C> {
    name: String,
    circuit: C,
    config: Config,
    backoff: Backoff,
    state: RwLock<BreakerState>,
    callbacks: Callbacks,
}

impl Breaker<()> {
    /// Create a breaker builder; the operation is supplied to `build`
    pub fn builder(name: impl Into<String>) -> BreakerBuilder {
        BreakerBuilder::new(name)
    }
}

impl<C: Circuit> Breaker<C> {
    /// Wrap `circuit`, opening after `failure_threshold` consecutive failures
    pub fn new(circuit: C, failure_threshold: u32) -> Self {
        let config = Config {
            failure_threshold,
            ..Default::default()
        };
        Self::with_parts("breaker".to_string(), circuit, config, Callbacks::new())
    }

    pub(crate) fn with_parts(
        name: String,
        circuit: C,
        config: Config,
        callbacks: Callbacks,
    ) -> Self {
        let backoff = config.backoff();
        let state = RwLock::new(BreakerState::new(config.failure_threshold));

        Self {
            name,
            circuit,
            config,
            backoff,
            state,
            callbacks,
        }
    }

    /// Run the protected operation unless the circuit is open
    ///
    /// A refused call returns [`BreakerError::Open`] without touching any
    /// state. An admitted call runs with `ctx`, outside any lock, and its
    /// outcome is recorded before being returned unchanged.
    pub async fn call(
        &self,
        ctx: CancellationToken,
    ) -> Result<C::Output, BreakerError<C::Error>> {
        if let Some(retry_after) = self.admission_delay() {
            warn!(
                circuit = %self.name,
                retry_in_ms = u64::try_from(retry_after.as_millis()).unwrap_or(u64::MAX),
                "circuit open, refusing call"
            );
            self.callbacks.trigger_reject(&self.name);
            return Err(BreakerError::Open {
                circuit: self.name.clone(),
                retry_after,
            });
        }

        debug!(circuit = %self.name, "call admitted");

        match self.circuit.call(ctx).await {
            Ok(value) => {
                self.record_success();
                Ok(value)
            }
            Err(e) => {
                self.record_failure();
                Err(BreakerError::Execution(e))
            }
        }
    }

    /// Remaining backoff if a call issued now would be refused
    fn admission_delay(&self) -> Option<Duration> {
        let state = self.state.read();
        let retry_at = state.retry_at()?;
        let now = Instant::now();

        match retry_at {
            Some(retry_at) if now > retry_at => None,
            Some(retry_at) => Some(retry_at.duration_since(now)),
            None => Some(Duration::MAX),
        }
    }

    fn record_success(&self) {
        let was_open = {
            let mut state = self.state.write();
            state.last_attempt = Instant::now();
            let was_open = state.deficit().is_some();
            state.consecutive_failures = 0;
            state.window = None;
            was_open
        };

        debug!(circuit = %self.name, "success recorded");
        if was_open {
            info!(circuit = %self.name, "circuit closed");
            self.callbacks.trigger_close(&self.name);
        }
    }

    fn record_failure(&self) {
        let (failures, opened) = {
            let mut state = self.state.write();
            state.last_attempt = Instant::now();
            let was_open = state.deficit().is_some();
            state.consecutive_failures = state.consecutive_failures.saturating_add(1);
            // Jitter is rolled once per failure so the gate stays stable
            state.window = state.deficit().map(|d| self.backoff.window(d));
            (
                state.consecutive_failures,
                !was_open && state.deficit().is_some(),
            )
        };

        debug!(circuit = %self.name, failures, "failure recorded");
        if opened {
            warn!(circuit = %self.name, failures, "circuit opened");
            self.callbacks.trigger_open(&self.name);
        }
    }

    /// Clear the failure counter as if a call had just succeeded
    pub fn reset(&self) {
        self.record_success();
    }

    /// Copy of the current state
    pub fn state(&self) -> BreakerState {
        *self.state.read()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.state.read().consecutive_failures
    }

    /// Whether a call issued now would be refused
    pub fn is_open(&self) -> bool {
        self.admission_delay().is_some()
    }

    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    /// Earliest instant a call is admitted again, `None` in the closed region
    pub fn retry_at(&self) -> Option<Instant> {
        self.state.read().retry_at().flatten()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<C: Circuit> Circuit for Breaker<C> {
    type Output = C::Output;
    type Error = BreakerError<C::Error>;

    fn call(
        &self,
        ctx: CancellationToken,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        Breaker::call(self, ctx)
    }
}

impl<C> std::fmt::Debug for Breaker<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Breaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("state", &*self.state.read())
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

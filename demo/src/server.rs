//! Flaky HTTP endpoint used to generate failures

use axum::{Router, extract::State, http::StatusCode, routing::get};
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

pub const SUCCESS_BODY: &str = "Hello, world!\n";
pub const FAILURE_BODY: &str = "internal error";

/// Shared state of the flaky endpoint
#[derive(Debug)]
pub struct FlakyState {
    failure_rate: f64,
    served: AtomicUsize,
}

impl FlakyState {
    /// `failure_rate` is clamped to 0.0..=1.0; NaN means never fail
    pub fn new(failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };
        Self {
            failure_rate,
            served: AtomicUsize::new(0),
        }
    }

    /// Number of requests answered so far
    pub fn served(&self) -> usize {
        self.served.load(Ordering::Relaxed)
    }
}

/// Router exposing `GET /hello`
pub fn router(state: Arc<FlakyState>) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .with_state(state)
}

async fn hello(State(state): State<Arc<FlakyState>>) -> (StatusCode, &'static str) {
    let n = state.served.fetch_add(1, Ordering::Relaxed);

    if rand::thread_rng().gen_bool(state.failure_rate) {
        info!(request = n, response = FAILURE_BODY, "answered");
        (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_BODY)
    } else {
        info!(request = n, response = SUCCESS_BODY.trim_end(), "answered");
        (StatusCode::OK, SUCCESS_BODY)
    }
}

//! Timing and counting laws of the breaker, driven on tokio's paused clock

use backoff_breaker::{Breaker, BreakerError, CancellationToken, circuit_fn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Script = Arc<Mutex<VecDeque<Result<String, String>>>>;

/// Breaker over an operation that replays `outcomes` in order
fn replaying(
    threshold: u32,
    outcomes: Vec<Result<&str, &str>>,
) -> (Breaker<impl backoff_breaker::Circuit<Output = String, Error = String>>, Script) {
    let script: Script = Arc::new(Mutex::new(
        outcomes
            .into_iter()
            .map(|o| o.map(str::to_string).map_err(str::to_string))
            .collect(),
    ));

    let op = {
        let script = script.clone();
        circuit_fn(move |_ctx| {
            let next = script
                .lock()
                .unwrap()
                .pop_front()
                .expect("operation invoked more often than scripted");
            async move { next }
        })
    };

    (Breaker::new(op, threshold), script)
}

async fn call(
    breaker: &Breaker<impl backoff_breaker::Circuit<Output = String, Error = String>>,
) -> Result<String, BreakerError<String>> {
    breaker.call(CancellationToken::new()).await
}

#[tokio::test(start_paused = true)]
async fn test_threshold_two_scenario() {
    let (breaker, script) = replaying(
        2,
        vec![
            Err("internal error"),
            Err("internal error"),
            Err("internal error"),
            Ok("Hello, world!\n"),
            Ok("Hello, world!\n"),
        ],
    );

    assert!(call(&breaker).await.is_err());
    assert!(call(&breaker).await.is_err());
    tokio::time::advance(Duration::from_millis(1001)).await;
    assert_eq!(
        call(&breaker).await.unwrap_err().into_inner().as_deref(),
        Some("internal error")
    );
    assert_eq!(breaker.consecutive_failures(), 3);

    // deficit 1: refused for two seconds after the third failure
    for _ in 0..4 {
        assert!(call(&breaker).await.unwrap_err().is_open());
        tokio::time::advance(Duration::from_millis(500)).await;
    }
    assert!(call(&breaker).await.unwrap_err().is_open());

    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(call(&breaker).await.unwrap(), "Hello, world!\n");
    assert_eq!(breaker.consecutive_failures(), 0);
    assert_eq!(call(&breaker).await.unwrap(), "Hello, world!\n");

    assert!(script.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_minimum_wait_is_two_to_the_k() {
    let threshold = 3;
    let extra = 4u32;
    let (breaker, _script) = replaying(
        threshold,
        (0..threshold + extra + 1).map(|_| Err("internal error")).collect(),
    );

    for _ in 0..threshold {
        let _ = call(&breaker).await;
    }

    for k in 0..=extra {
        let window = Duration::from_secs(1 << k);
        let failed_at = breaker.state().last_attempt;
        assert_eq!(breaker.retry_at(), Some(failed_at + window));

        tokio::time::advance(window).await;
        assert!(call(&breaker).await.unwrap_err().is_open(), "k = {}", k);

        if k == extra {
            break;
        }
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!call(&breaker).await.unwrap_err().is_open(), "k = {}", k);
    }
}

#[tokio::test(start_paused = true)]
async fn test_success_always_resets() {
    let pattern = [3usize, 0, 1, 6, 2];
    let mut outcomes = Vec::new();
    for failures in pattern {
        outcomes.extend(std::iter::repeat_n(Err("internal error"), failures));
        outcomes.push(Ok("Hello, world!\n"));
    }
    let (breaker, script) = replaying(1, outcomes);

    for failures in pattern {
        for _ in 0..failures {
            // Step past any backoff so every scripted outcome runs
            tokio::time::advance(Duration::from_secs(3600)).await;
            assert!(!call(&breaker).await.unwrap_err().is_open());
        }
        tokio::time::advance(Duration::from_secs(3600)).await;
        assert!(call(&breaker).await.is_ok());
        assert_eq!(breaker.consecutive_failures(), 0);
        assert!(breaker.is_closed());
    }

    assert!(script.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_errors_forwarded_unmodified() {
    let (breaker, _script) = replaying(5, vec![Err("unexpected status code: 500"), Ok("")]);

    let err = call(&breaker).await.unwrap_err();
    assert_eq!(err.to_string(), "unexpected status code: 500");
    assert_eq!(err.into_inner().as_deref(), Some("unexpected status code: 500"));

    assert_eq!(call(&breaker).await.unwrap(), "");
}

//! Breaker driving real HTTP requests against the flaky server

use backoff_breaker::{Breaker, BreakerError, CancellationToken};
use backoff_breaker_demo::{FetchError, FlakyState, HttpFetch, router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_server(failure_rate: f64) -> (SocketAddr, Arc<FlakyState>) {
    let state = Arc::new(FlakyState::new(failure_rate));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

fn fetch(addr: SocketAddr) -> HttpFetch {
    HttpFetch::new(format!("http://{}/hello", addr), Duration::from_secs(1)).unwrap()
}

#[tokio::test]
async fn test_healthy_server_passes_through() {
    let (addr, state) = spawn_server(0.0).await;
    let breaker = Breaker::new(fetch(addr), 2);

    for _ in 0..3 {
        let body = breaker.call(CancellationToken::new()).await.unwrap();
        assert_eq!(body, "Hello, world!\n");
    }
    assert_eq!(state.served(), 3);
    assert_eq!(breaker.consecutive_failures(), 0);
}

#[tokio::test]
async fn test_failing_server_trips_breaker() {
    let (addr, state) = spawn_server(1.0).await;
    let breaker = Breaker::builder("flaky")
        .failure_threshold(2)
        .base_window(Duration::from_secs(60))
        .build(fetch(addr));

    for _ in 0..2 {
        let err = breaker.call(CancellationToken::new()).await.unwrap_err();
        match err {
            BreakerError::Execution(FetchError::Status(code)) => assert_eq!(code, 500),
            other => panic!("unexpected error: {}", other),
        }
    }

    let err = breaker.call(CancellationToken::new()).await.unwrap_err();
    assert!(err.is_open());
    assert_eq!(state.served(), 2, "refused call must not reach the server");
}

#[tokio::test]
async fn test_unreachable_server_counts_as_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let breaker = Breaker::new(fetch(addr), 1);
    let err = breaker.call(CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, BreakerError::Execution(FetchError::Request(_))));
    assert_eq!(breaker.consecutive_failures(), 1);
    assert!(breaker.is_open());
}

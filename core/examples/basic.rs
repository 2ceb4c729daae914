//! Basic breaker usage example

use backoff_breaker::{Breaker, CancellationToken, circuit_fn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[tokio::main]
async fn main() {
    println!("=== Circuit Breaker Basic Example ===\n");

    let healthy = Arc::new(AtomicBool::new(true));
    let op = {
        let healthy = healthy.clone();
        circuit_fn(move |_ctx| {
            let healthy = healthy.load(Ordering::SeqCst);
            async move {
                if healthy {
                    Ok("Payment accepted".to_string())
                } else {
                    Err("Payment gateway failed".to_string())
                }
            }
        })
    };

    let breaker = Breaker::builder("payment_api")
        .failure_threshold(2)
        .base_window(Duration::from_millis(200))
        .on_open(|name| println!("🔴 Circuit '{}' opened!", name))
        .on_close(|name| println!("🟢 Circuit '{}' closed!", name))
        .build(op);

    let ctx = CancellationToken::new();

    println!("--- Successful calls ---");
    for _ in 0..2 {
        report(breaker.call(ctx.clone()).await);
    }

    println!("\n--- Triggering failures ---");
    healthy.store(false, Ordering::SeqCst);
    for _ in 0..3 {
        report(breaker.call(ctx.clone()).await);
    }
    println!("Consecutive failures: {}\n", breaker.consecutive_failures());

    println!("--- Waiting out the backoff window ---");
    tokio::time::sleep(Duration::from_millis(250)).await;
    healthy.store(true, Ordering::SeqCst);
    report(breaker.call(ctx.clone()).await);
    println!("Consecutive failures: {}", breaker.consecutive_failures());
}

fn report<E: std::fmt::Display>(result: Result<String, E>) {
    match result {
        Ok(value) => println!("✓ {}", value),
        Err(e) => println!("✗ {}", e),
    }
}

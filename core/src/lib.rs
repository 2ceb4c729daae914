//! backoff-breaker - consecutive-failure circuit breaker for async operations
//!
//! This crate wraps a cancellable, fallible operation with:
//! - A consecutive-failure counter, reset on any success
//! - Exponential backoff once the threshold is reached (1s, 2s, 4s, ...)
//! - Read-locked admission checks and write-locked recording, with the
//!   operation itself running outside any lock
//! - Monotonic time tracking via `tokio::time::Instant`
//!
//! There is no half-open probe state: when a backoff window elapses every
//! waiting caller is admitted.
//!
//! # Example
//!
//! ```rust
//! use backoff_breaker::{Breaker, circuit_fn};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let breaker = Breaker::builder("hello")
//!     .failure_threshold(2)
//!     .on_open(|name| println!("Circuit {} opened!", name))
//!     .build(circuit_fn(|_ctx| async {
//!         // Your service call here
//!         Ok::<_, String>("Hello, world!".to_string())
//!     }));
//!
//! match breaker.call(CancellationToken::new()).await {
//!     Ok(body) => println!("{}", body),
//!     Err(e) if e.is_open() => println!("circuit open, skipping call"),
//!     Err(e) => println!("call failed: {}", e),
//! }
//! # }
//! ```

pub mod backoff;
pub mod breaker;
pub mod builder;
pub mod callbacks;
pub mod circuit;
pub mod errors;

pub use backoff::Backoff;
pub use breaker::{Breaker, BreakerState, Config};
pub use builder::BreakerBuilder;
pub use circuit::{Circuit, CircuitFn, circuit_fn};
pub use errors::BreakerError;
pub use tokio_util::sync::CancellationToken;

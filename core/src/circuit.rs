//! The protected-operation interface
//!
//! A [`Circuit`] is any cancellable, fallible async operation. The breaker
//! consumes one and is itself a `Circuit` of the same shape, so a guarded
//! operation can be handed to anything that accepts an unguarded one.

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// A cancellable, fallible operation
///
/// Implementations must honor `ctx` promptly: once it is cancelled the
/// returned future should resolve with an error rather than keep waiting.
pub trait Circuit: Send + Sync {
    type Output: Send;
    type Error: Send;

    fn call(
        &self,
        ctx: CancellationToken,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}

/// Adapter returned by [`circuit_fn`]
#[derive(Clone)]
pub struct CircuitFn<F> {
    f: F,
}

/// Turn a closure returning a future into a [`Circuit`]
///
/// ```rust
/// use backoff_breaker::{Circuit, circuit_fn};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() {
/// let op = circuit_fn(|_ctx: CancellationToken| async { Ok::<_, String>("7".to_string()) });
/// assert_eq!(op.call(CancellationToken::new()).await.unwrap(), "7");
/// # }
/// ```
pub fn circuit_fn<F, Fut, T, E>(f: F) -> CircuitFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
{
    CircuitFn { f }
}

impl<F, Fut, T, E> Circuit for CircuitFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
{
    type Output = T;
    type Error = E;

    fn call(&self, ctx: CancellationToken) -> impl Future<Output = Result<T, E>> + Send {
        (self.f)(ctx)
    }
}

impl<F> std::fmt::Debug for CircuitFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitFn")
            .field("f", &"<closure>")
            .finish()
    }
}

impl<C: Circuit> Circuit for std::sync::Arc<C> {
    type Output = C::Output;
    type Error = C::Error;

    fn call(
        &self,
        ctx: CancellationToken,
    ) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send {
        (**self).call(ctx)
    }
}

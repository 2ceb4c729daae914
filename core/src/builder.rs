//! Builder API for ergonomic breaker configuration

use crate::{
    breaker::{Breaker, Config},
    callbacks::Callbacks,
    circuit::Circuit,
};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating breakers with fluent API
#[derive(Debug)]
pub struct BreakerBuilder {
    name: String,
    config: Config,
    callbacks: Callbacks,
}

impl BreakerBuilder {
    /// Create a new builder for a breaker with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: Config::default(),
            callbacks: Callbacks::new(),
        }
    }

    /// Set the number of consecutive failures tolerated before opening
    ///
    /// Zero opens the circuit after the first failure.
    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.config.failure_threshold = threshold;
        self
    }

    /// Set the backoff window used once the threshold is reached
    pub fn base_window(mut self, window: Duration) -> Self {
        self.config.base_window = window;
        self
    }

    /// Cap every backoff window at `window`
    pub fn max_window(mut self, window: Duration) -> Self {
        self.config.max_window = Some(window);
        self
    }

    /// Set the jitter factor (0.0 = no jitter, 1.0 = full jitter)
    /// Uses chrono-machines formula: window * (1 - jitter + rand * jitter)
    pub fn jitter_factor(mut self, factor: f64) -> Self {
        self.config.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set callback for when the circuit opens
    pub fn on_open<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.callbacks.on_open = Some(Arc::new(f));
        self
    }

    /// Set callback for when the circuit closes after being open
    pub fn on_close<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.callbacks.on_close = Some(Arc::new(f));
        self
    }

    /// Set callback for every refused call
    pub fn on_reject<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.callbacks.on_reject = Some(Arc::new(f));
        self
    }

    /// Build the breaker around `circuit`
    pub fn build<C: Circuit>(self, circuit: C) -> Breaker<C> {
        Breaker::with_parts(self.name, circuit, self.config, self.callbacks)
    }
}

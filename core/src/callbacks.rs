//! Hooks fired when the breaker changes region or refuses a call

use std::sync::Arc;

type Hook = Arc<dyn Fn(&str) + Send + Sync>;

/// Callbacks for breaker events, each receiving the circuit name
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_open: Option<Hook>,
    pub on_close: Option<Hook>,
    pub on_reject: Option<Hook>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger_open(&self, circuit: &str) {
        if let Some(ref callback) = self.on_open {
            callback(circuit);
        }
    }

    pub fn trigger_close(&self, circuit: &str) {
        if let Some(ref callback) = self.on_close {
            callback(circuit);
        }
    }

    pub fn trigger_reject(&self, circuit: &str) {
        if let Some(ref callback) = self.on_reject {
            callback(circuit);
        }
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_reject", &self.on_reject.is_some())
            .finish()
    }
}

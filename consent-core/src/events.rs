//! Telemetry event types for the process-wide event sink

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named telemetry event with an arbitrary parameter map.
///
/// Delivery is best-effort and fire-and-forget; loss under overload is
/// acceptable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Event name (e.g. "login", "discover_accounts")
    pub name: String,
    /// Event category (e.g. "network", "session")
    pub category: String,
    /// Arbitrary event parameters
    pub params: Map<String, Value>,
}

impl TelemetryEvent {
    /// Event with an empty parameter map.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            params: Map::new(),
        }
    }

    /// Attach a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Receiver of telemetry events.
///
/// Exactly one listener is registered at process start and lives for the
/// process lifetime.
pub trait EventListener: Send + Sync {
    /// Called for every emitted event while events are enabled.
    fn on_event(&self, event: &TelemetryEvent);
}

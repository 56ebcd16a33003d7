//! Process-wide telemetry event sink
//!
//! Exactly one listener is registered at process start and is never
//! unregistered in normal operation. Delivery is best-effort and
//! fire-and-forget: emitting never blocks the calling operation and never
//! fails it.

use consent_core::{EventListener, TelemetryEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

lazy_static::lazy_static! {
    static ref LISTENER: RwLock<Option<Arc<dyn EventListener>>> = RwLock::new(None);
}

static EVENTS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Install the process-wide event listener.
///
/// Returns `false` if a listener is already registered; the existing listener
/// is never replaced.
pub fn register_event_listener(listener: Arc<dyn EventListener>) -> bool {
    let mut slot = match LISTENER.write() {
        Ok(slot) => slot,
        Err(poisoned) => poisoned.into_inner(),
    };
    if slot.is_some() {
        return false;
    }
    *slot = Some(listener);
    true
}

/// Enable or disable event delivery. Events emitted while disabled are
/// dropped.
pub fn set_events_enabled(enabled: bool) {
    EVENTS_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Deliver an event to the registered listener, if any.
///
/// Best-effort: a contended lock or a missing listener drops the event.
pub fn emit(event: TelemetryEvent) {
    if !EVENTS_ENABLED.load(Ordering::Relaxed) {
        return;
    }
    let Ok(slot) = LISTENER.try_read() else {
        return;
    };
    if let Some(listener) = slot.as_ref() {
        listener.on_event(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counting(AtomicUsize);

    impl EventListener for Counting {
        fn on_event(&self, _event: &TelemetryEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn second_registration_is_rejected_and_delivery_is_gated() {
        let first = Arc::new(Counting(AtomicUsize::new(0)));
        let second = Arc::new(Counting(AtomicUsize::new(0)));

        // Global sink: only the first registration in the process wins. When
        // another test got there first this still exercises the rejection
        // path.
        register_event_listener(first.clone());
        assert!(!register_event_listener(second.clone()));

        set_events_enabled(false);
        emit(TelemetryEvent::new("dropped", "test"));
        assert_eq!(second.0.load(Ordering::SeqCst), 0);

        set_events_enabled(true);
        emit(TelemetryEvent::new("delivered", "test"));
        assert_eq!(second.0.load(Ordering::SeqCst), 0);
    }
}

use std::sync::Arc;
use std::time::{Duration, Instant};

use threatkit_core::{AppEvent, EventBus, NotificationEvent, SessionError, SharedClock};

/// Publishes user-visible notifications on the event bus.
///
/// Confirmations are rate limited: one emitted within `min_interval` of
/// the previous one is dropped. Errors are never suppressed.
pub struct Notifier {
    bus: Arc<EventBus>,
    clock: SharedClock,
    min_interval: Duration,
    last_confirmation: Option<Instant>,
    suppressed: u64,
}

impl Notifier {
    pub fn new(bus: Arc<EventBus>, clock: SharedClock, min_interval: Duration) -> Self {
        Self {
            bus,
            clock,
            min_interval,
            last_confirmation: None,
            suppressed: 0,
        }
    }

    /// Emits a confirmation unless one was emitted too recently.
    ///
    /// Returns true if the confirmation was published.
    pub fn confirm(&mut self, message: impl Into<String>) -> bool {
        let now = self.clock.now();
        let message = message.into();

        if let Some(last) = self.last_confirmation {
            if now.saturating_duration_since(last) < self.min_interval {
                self.suppressed += 1;
                tracing::debug!(message = %message, "Confirmation suppressed");
                return false;
            }
        }

        self.last_confirmation = Some(now);
        self.bus
            .publish(AppEvent::Notification(NotificationEvent::Confirmation { message }));
        true
    }

    /// Emits a dismissible error notification.
    pub fn error(&self, error: &SessionError) {
        tracing::warn!(kind = %error.kind(), "{}", error);
        self.bus.publish(AppEvent::Notification(NotificationEvent::Error {
            message: error.to_string(),
            kind: error.kind().to_string(),
        }));
    }

    /// Number of confirmations dropped by rate limiting.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("min_interval", &self.min_interval)
            .field("last_confirmation", &self.last_confirmation)
            .field("suppressed", &self.suppressed)
            .finish()
    }
}

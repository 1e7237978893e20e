use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Decides whether enough time has passed since the last alert.
#[derive(Debug, Clone, Copy)]
pub struct AlertGate {
    cooldown: Duration,
}

impl AlertGate {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Permit when there is no previous alert or the cooldown has fully
    /// elapsed. The boundary is inclusive.
    pub fn permits(&self, last_alert: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_alert {
            None => true,
            Some(last) if last > now => {
                // A marker from the future can only come from a bad clock or a
                // hand-edited file; treat it like a corrupt one.
                warn!("⚠️ Last alert time {} is after now ({}); ignoring it", last, now);
                true
            }
            Some(last) => now.signed_duration_since(last) >= self.cooldown,
        }
    }

    /// Time left before the gate opens again, if it is currently closed.
    pub fn remaining(&self, last_alert: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<Duration> {
        if self.permits(last_alert, now) {
            return None;
        }
        last_alert.map(|last| self.cooldown - now.signed_duration_since(last))
    }
}

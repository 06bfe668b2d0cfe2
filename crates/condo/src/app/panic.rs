//! Long-press panic button.
//!
//! Terminals report a held key as a stream of repeated presses, so a hold is considered
//! released once no press has arrived for `release_grace`.

use std::time::{Duration, Instant};

use time::OffsetDateTime;

use crate::app::ports::{AlertGateway, PanicAlert};
use crate::domain::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanicState {
    Idle,
    Holding { since: Instant, last_seen: Instant },
    Triggered { at: Instant },
}

/// Emitted once when a hold completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanicTrigger {
    pub at: Instant,
}

#[derive(Debug, Clone)]
pub struct PanicButton {
    hold: Duration,
    release_grace: Duration,
    state: PanicState,
}

impl PanicButton {
    pub fn new(hold: Duration, release_grace: Duration) -> Self {
        Self {
            hold,
            release_grace,
            state: PanicState::Idle,
        }
    }

    pub fn state(&self) -> PanicState {
        self.state
    }

    pub fn hold_duration(&self) -> Duration {
        self.hold
    }

    pub fn is_triggered(&self) -> bool {
        matches!(self.state, PanicState::Triggered { .. })
    }

    /// Register a press (or a key repeat while held).
    pub fn press(&mut self, now: Instant) {
        match self.state {
            PanicState::Idle => {
                tracing::debug!("panic hold started");
                self.state = PanicState::Holding {
                    since: now,
                    last_seen: now,
                };
            }
            PanicState::Holding { since, .. } => {
                self.state = PanicState::Holding {
                    since,
                    last_seen: now,
                };
            }
            PanicState::Triggered { .. } => {}
        }
    }

    /// Cancel an unfinished hold.
    pub fn release(&mut self, _now: Instant) {
        if let PanicState::Holding { .. } = self.state {
            tracing::debug!("panic hold released early");
            self.state = PanicState::Idle;
        }
    }

    /// Advance the timer. Returns the trigger exactly once, when the hold completes.
    ///
    /// A hold only completes if it was still live when the hold duration ran out, so a late
    /// tick cannot fire a hold whose grace window had already lapsed.
    pub fn tick(&mut self, now: Instant) -> Option<PanicTrigger> {
        let PanicState::Holding { since, last_seen } = self.state else {
            return None;
        };
        let completes_at = since + self.hold;
        let released_at = last_seen + self.release_grace;

        if now >= completes_at && released_at >= completes_at {
            tracing::warn!(held_ms = self.hold.as_millis() as u64, "panic button triggered");
            self.state = PanicState::Triggered { at: now };
            return Some(PanicTrigger { at: now });
        }

        if now > released_at {
            self.release(now);
        }
        None
    }

    /// Fraction of the hold completed, in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        match self.state {
            PanicState::Idle => 0.0,
            PanicState::Triggered { .. } => 1.0,
            PanicState::Holding { since, .. } => {
                if self.hold.is_zero() {
                    return 1.0;
                }
                let held = now.saturating_duration_since(since).as_secs_f64();
                (held / self.hold.as_secs_f64()).clamp(0.0, 1.0)
            }
        }
    }

    /// Acknowledge a triggered alert or abandon a hold.
    pub fn reset(&mut self) {
        self.state = PanicState::Idle;
    }
}

/// Send the alert for a completed hold.
pub fn dispatch_alert(
    gateway: &dyn AlertGateway,
    unit: &str,
    raised_by: &str,
    raised_at: OffsetDateTime,
) -> Result<PanicAlert, DomainError> {
    let alert = PanicAlert {
        unit: unit.to_owned(),
        raised_by: raised_by.to_owned(),
        raised_at,
    };
    gateway.raise_panic(&alert)?;
    Ok(alert)
}

//! Fixed-cadence poll timer.

/// Fires once per `interval` seconds of simulation time.
///
/// The first firing happens one interval after the first call to
/// [`PollTimer::due`]. When the caller falls behind by several intervals the
/// timer fires once and re-arms from the current time instead of bursting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollTimer {
    interval: f32,
    next_due: Option<f32>,
}

impl PollTimer {
    /// Creates an unarmed timer.
    #[must_use]
    pub const fn new(interval: f32) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Seconds between firings.
    #[must_use]
    pub const fn interval(&self) -> f32 {
        self.interval
    }

    /// Returns `true` when a poll is due at `now`, re-arming the timer.
    pub fn due(&mut self, now: f32) -> bool {
        match self.next_due {
            None => {
                self.next_due = Some(now + self.interval);
                false
            }
            Some(due) if now >= due => {
                let next = due + self.interval;
                self.next_due = Some(if next <= now { now + self.interval } else { next });
                true
            }
            Some(_) => false,
        }
    }
}

//! Bounded exponential backoff for re-attempting foreground elevation.

use std::time::{Duration, Instant};

use vigil_config::Config;

/// Schedules elevation re-attempts after policy denials.
///
/// Each denial doubles the delay, capped at `max`. Once `budget` re-attempts
/// have been scheduled the schedule is exhausted and the supervisor stays in
/// best-effort mode until its next incarnation.
#[derive(Debug, Clone)]
pub struct ElevationBackoff {
    initial: Duration,
    max: Duration,
    budget: u32,
    scheduled: u32,
    denied: bool,
    next_at: Option<Instant>,
}

impl ElevationBackoff {
    /// Builds a schedule from explicit parameters.
    #[must_use]
    pub fn new(initial: Duration, max: Duration, budget: u32) -> Self {
        Self {
            initial,
            max: max.max(initial),
            budget,
            scheduled: 0,
            denied: false,
            next_at: None,
        }
    }

    /// Builds a schedule from the resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.elevation_retry_initial(),
            config.elevation_retry_max(),
            config.elevation_retry_attempts(),
        )
    }

    /// Records a denial at `now` and returns the delay until the next attempt.
    ///
    /// Returns `None` once the budget is spent.
    pub fn record_denial(&mut self, now: Instant) -> Option<Duration> {
        self.denied = true;
        if self.scheduled >= self.budget {
            self.next_at = None;
            return None;
        }
        let delay = self.delay_for(self.scheduled);
        self.scheduled += 1;
        self.next_at = now.checked_add(delay);
        self.next_at.map(|_| delay)
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt);
        self.initial.saturating_mul(factor).min(self.max)
    }

    /// Whether a scheduled re-attempt is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        self.next_at.is_some_and(|at| now >= at)
    }

    /// Instant of the next scheduled re-attempt, if any.
    #[must_use]
    pub const fn next_attempt(&self) -> Option<Instant> {
        self.next_at
    }

    /// Whether a re-attempt is scheduled but not yet due.
    #[must_use]
    pub fn is_waiting(&self, now: Instant) -> bool {
        self.next_at.is_some_and(|at| now < at)
    }

    /// Whether a denial in this incarnation has spent every re-attempt.
    ///
    /// A fresh schedule is never exhausted, even with a zero budget.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.denied && self.scheduled >= self.budget && self.next_at.is_none()
    }

    /// Clears the schedule after a successful elevation or a new incarnation.
    pub const fn reset(&mut self) {
        self.scheduled = 0;
        self.denied = false;
        self.next_at = None;
    }
}

//! Countdown timers.
//!
//! Every cooldown and action lock in the controller (sprint toggle debounce,
//! climb cooldown, blade-draw debounce, fall timeout, post-landing stun) is a
//! [`Countdown`]: a remaining duration that only decreases while positive and
//! stays expired until explicitly re-armed.

use bevy::prelude::*;

/// A one-shot countdown in seconds.
///
/// Unlike a repeating timer, a `Countdown` never wraps: once `remaining`
/// reaches zero it is expired until [`reset`](Countdown::reset) or
/// [`arm`](Countdown::arm) is called. Each countdown is owned exclusively by
/// the state that uses it.
///
/// # Example
///
/// ```rust
/// use third_person_controller::timer::Countdown;
///
/// let mut cooldown = Countdown::new(0.5);
/// assert!(!cooldown.expired());
/// cooldown.tick(0.5);
/// assert!(cooldown.expired());
/// cooldown.reset();
/// assert!(!cooldown.expired());
/// ```
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    remaining: f32,
    duration: f32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::ready(0.0)
    }
}

impl Countdown {
    /// Create a countdown that starts running from `duration`.
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            duration,
        }
    }

    /// Create an already-expired countdown with the given configured duration.
    ///
    /// Used for locks that must not block on startup, like the post-landing
    /// stun.
    pub fn ready(duration: f32) -> Self {
        Self {
            remaining: 0.0,
            duration,
        }
    }

    /// Advance the countdown by the elapsed tick time.
    ///
    /// Has no effect once expired; the remaining value never drifts further
    /// below zero than a single tick.
    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
    }

    /// Whether the countdown has run out.
    #[inline]
    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Remaining time in seconds. May be slightly negative after expiry.
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// The configured duration this countdown resets to.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Restart the countdown from its configured duration.
    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    /// Start the countdown from an explicit value, clamped to be non-negative.
    ///
    /// The configured duration is untouched; this is for computed windows
    /// like the landing stun.
    pub fn arm(&mut self, secs: f32) {
        self.remaining = secs.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_running() {
        let timer = Countdown::new(1.0);
        assert!(!timer.expired());
        assert_eq!(timer.remaining(), 1.0);
    }

    #[test]
    fn ready_starts_expired() {
        let timer = Countdown::ready(1.0);
        assert!(timer.expired());
        assert_eq!(timer.duration(), 1.0);
    }

    #[test]
    fn tick_decreases_until_expired() {
        let mut timer = Countdown::new(0.3);
        timer.tick(0.1);
        assert!(!timer.expired());
        timer.tick(0.1);
        assert!(!timer.expired());
        timer.tick(0.1);
        assert!(timer.expired());
    }

    #[test]
    fn tick_is_a_no_op_once_expired() {
        let mut timer = Countdown::new(0.1);
        timer.tick(0.2);
        let after_expiry = timer.remaining();
        timer.tick(10.0);
        assert_eq!(timer.remaining(), after_expiry);
    }

    #[test]
    fn reset_restores_configured_duration() {
        let mut timer = Countdown::new(0.5);
        timer.tick(0.5);
        assert!(timer.expired());
        timer.reset();
        assert!(!timer.expired());
        assert_eq!(timer.remaining(), 0.5);
    }

    #[test]
    fn arm_sets_an_explicit_window() {
        let mut timer = Countdown::ready(1.0);
        timer.arm(0.25);
        assert!(!timer.expired());
        assert_eq!(timer.remaining(), 0.25);
        assert_eq!(timer.duration(), 1.0);
    }

    #[test]
    fn arm_clamps_negative_values() {
        let mut timer = Countdown::ready(1.0);
        timer.arm(-3.0);
        assert!(timer.expired());
        assert_eq!(timer.remaining(), 0.0);
    }
}

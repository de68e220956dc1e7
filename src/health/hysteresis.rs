//! Alert hysteresis state machine.
//!
//! # States
//! - Quiet: alert flag off
//! - Alerting: sustained degradation observed
//!
//! # State Transitions
//! ```text
//! Quiet → Alerting: degraded_streak >= enter_threshold
//! Alerting → Quiet: stable_streak >= exit_threshold
//! ```
//!
//! # Design Decisions
//! - Only `Up` counts as stable; `Slow`, `Error`, `Down` and `Unknown` are degraded
//! - Streak counters are mutually exclusive: one resets when the other grows
//! - Thresholds are checked after the streak update, never retroactively

use crate::config::AlertConfig;
use crate::health::classification::Classification;

/// Streak counters and the debounced alert flag for one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HysteresisTracker {
    pub stable_streak: u32,
    pub degraded_streak: u32,
    pub alert_active: bool,
}

/// Outcome of feeding one classification into the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChange {
    Unchanged,
    Entered,
    Cleared,
}

impl AlertChange {
    /// `Some(new_flag)` when the alert flipped.
    pub fn flipped_to(self) -> Option<bool> {
        match self {
            AlertChange::Unchanged => None,
            AlertChange::Entered => Some(true),
            AlertChange::Cleared => Some(false),
        }
    }
}

impl HysteresisTracker {
    pub fn new(stable_streak: u32, degraded_streak: u32, alert_active: bool) -> Self {
        Self {
            stable_streak,
            degraded_streak,
            alert_active,
        }
    }

    /// Feed the classification of the latest check.
    pub fn observe(&mut self, classification: Classification, thresholds: &AlertConfig) -> AlertChange {
        if classification.is_stable() {
            self.stable_streak = self.stable_streak.saturating_add(1);
            self.degraded_streak = 0;
        } else {
            self.degraded_streak = self.degraded_streak.saturating_add(1);
            self.stable_streak = 0;
        }

        if !self.alert_active && self.degraded_streak >= thresholds.enter_threshold {
            self.alert_active = true;
            tracing::debug!(degraded_streak = self.degraded_streak, "Alert entry threshold reached");
            AlertChange::Entered
        } else if self.alert_active && self.stable_streak >= thresholds.exit_threshold {
            self.alert_active = false;
            tracing::debug!(stable_streak = self.stable_streak, "Alert exit threshold reached");
            AlertChange::Cleared
        } else {
            AlertChange::Unchanged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Classification::*;

    fn thresholds(enter: u32, exit: u32) -> AlertConfig {
        AlertConfig {
            enter_threshold: enter,
            exit_threshold: exit,
        }
    }

    #[test]
    fn test_streaks_are_mutually_exclusive() {
        let cfg = AlertConfig::default();
        let mut tracker = HysteresisTracker::default();
        let sequence = [Up, Slow, Slow, Error, Up, Down, Unknown, Up, Up, Up, Up, Down];
        for c in sequence {
            tracker.observe(c, &cfg);
            assert!(
                tracker.stable_streak == 0 || tracker.degraded_streak == 0,
                "both streaks nonzero after {c}: {tracker:?}"
            );
            assert!(tracker.stable_streak + tracker.degraded_streak > 0);
        }
    }

    #[test]
    fn test_single_failure_never_alerts() {
        let cfg = AlertConfig::default();
        let mut tracker = HysteresisTracker::default();
        for c in [Up, Down, Up, Error, Up, Slow, Up] {
            assert_eq!(tracker.observe(c, &cfg), AlertChange::Unchanged);
            assert!(!tracker.alert_active);
        }
    }

    #[test]
    fn test_enter_and_exit_thresholds() {
        let cfg = AlertConfig::default();
        let mut tracker = HysteresisTracker::default();

        assert_eq!(tracker.observe(Up, &cfg), AlertChange::Unchanged);
        assert_eq!(tracker.observe(Down, &cfg), AlertChange::Unchanged);
        assert_eq!(tracker.observe(Down, &cfg), AlertChange::Entered);
        assert!(tracker.alert_active);

        // Further failures keep the latch without re-firing
        assert_eq!(tracker.observe(Error, &cfg), AlertChange::Unchanged);

        assert_eq!(tracker.observe(Up, &cfg), AlertChange::Unchanged);
        assert_eq!(tracker.observe(Up, &cfg), AlertChange::Unchanged);
        assert!(tracker.alert_active);
        assert_eq!(tracker.observe(Up, &cfg), AlertChange::Cleared);
        assert!(!tracker.alert_active);
        assert_eq!(tracker.stable_streak, 3);
    }

    #[test]
    fn test_recovery_blip_restarts_exit_count() {
        let cfg = AlertConfig::default();
        let mut tracker = HysteresisTracker::new(0, 5, true);

        tracker.observe(Up, &cfg);
        tracker.observe(Up, &cfg);
        tracker.observe(Slow, &cfg);
        assert!(tracker.alert_active);
        tracker.observe(Up, &cfg);
        tracker.observe(Up, &cfg);
        assert!(tracker.alert_active);
        assert_eq!(tracker.observe(Up, &cfg), AlertChange::Cleared);
    }

    #[test]
    fn test_slow_counts_as_degraded() {
        let cfg = thresholds(2, 1);
        let mut tracker = HysteresisTracker::default();
        tracker.observe(Slow, &cfg);
        assert_eq!(tracker.observe(Slow, &cfg), AlertChange::Entered);
        assert_eq!(tracker.observe(Up, &cfg), AlertChange::Cleared);
    }

    #[test]
    fn test_alert_never_sooner_than_thresholds() {
        let cfg = thresholds(3, 4);
        let mut tracker = HysteresisTracker::default();
        let mut consecutive_bad = 0;
        let mut consecutive_good = 0;
        let sequence = [Down, Down, Up, Down, Down, Down, Up, Up, Up, Down, Up, Up, Up, Up];
        for c in sequence {
            let was_alerting = tracker.alert_active;
            let change = tracker.observe(c, &cfg);
            if c.is_stable() {
                consecutive_good += 1;
                consecutive_bad = 0;
            } else {
                consecutive_bad += 1;
                consecutive_good = 0;
            }
            match change {
                AlertChange::Entered => assert!(!was_alerting && consecutive_bad >= 3),
                AlertChange::Cleared => assert!(was_alerting && consecutive_good >= 4),
                AlertChange::Unchanged => assert_eq!(was_alerting, tracker.alert_active),
            }
        }
        assert!(!tracker.alert_active);
    }

    #[test]
    fn test_streaks_saturate() {
        let cfg = AlertConfig::default();
        let mut tracker = HysteresisTracker::new(u32::MAX, 0, false);
        tracker.observe(Up, &cfg);
        assert_eq!(tracker.stable_streak, u32::MAX);
    }

    #[test]
    fn test_flipped_to() {
        assert_eq!(AlertChange::Entered.flipped_to(), Some(true));
        assert_eq!(AlertChange::Cleared.flipped_to(), Some(false));
        assert_eq!(AlertChange::Unchanged.flipped_to(), None);
    }
}

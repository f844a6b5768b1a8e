//! Animation clock
//!
//! Integrates real elapsed time into a virtual time that runs faster while the
//! practitioner is active or aligning. Downstream visuals phase their periodic
//! motion on the virtual time.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ClockConfig;
use crate::types::AlignmentReading;

/// Virtual animation time for a session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationClock {
    /// Accumulated virtual time (seconds)
    pub virtual_time: f64,
    /// Real seconds credited since the first frame; never decreases
    #[serde(default)]
    pub session_s: f64,
    /// Timestamp of the previous frame, None before the first frame
    pub last_timestamp_s: Option<f64>,
}

/// Real time credited for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elapsed {
    /// Seconds credited (never negative)
    pub dt: f64,
    /// Whether the frame timestamp went backwards or was not finite
    pub time_anomaly: bool,
}

/// Outcome of one clock tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    /// Real time credited for the frame (never negative)
    pub dt: f64,
    pub speed_multiplier: f64,
    /// Whether the frame timestamp went backwards or was not finite
    pub time_anomaly: bool,
}

impl AnimationClock {
    /// Speed multiplier for the given state
    pub fn speed_multiplier(config: &ClockConfig, alignment: &AlignmentReading, active: bool) -> f64 {
        if alignment.is_aligning() {
            config.aligning_speed
        } else if active {
            config.active_speed
        } else {
            config.idle_speed
        }
    }

    /// Real time elapsed since the previous frame. The first frame credits 0.
    pub fn elapsed_since_last(&self, now_s: f64) -> f64 {
        match self.last_timestamp_s {
            Some(last) => now_s - last,
            None => 0.0,
        }
    }

    /// Credit the real time up to the frame at `now_s`.
    ///
    /// A backwards jump credits nothing and restarts measurement from `now_s`,
    /// so a source whose clock restarted keeps accumulating session time.
    pub fn observe(&mut self, now_s: f64) -> Elapsed {
        let raw_dt = self.elapsed_since_last(now_s);
        let time_anomaly = !raw_dt.is_finite() || raw_dt < 0.0;
        if time_anomaly {
            warn!(now_s, last = ?self.last_timestamp_s, "non-monotonic frame timestamp, crediting no time");
        }

        let dt = if time_anomaly { 0.0 } else { raw_dt };
        self.session_s += dt;
        if now_s.is_finite() {
            self.last_timestamp_s = Some(now_s);
        }

        Elapsed { dt, time_anomaly }
    }

    /// Advance by `dt` seconds of real time at the given speed.
    ///
    /// Negative or non-finite `dt` credits nothing, keeping virtual time
    /// non-decreasing.
    pub fn advance(&mut self, dt: f64, speed_multiplier: f64) -> f64 {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.virtual_time += dt * speed_multiplier;
        self.virtual_time
    }

    /// Integrate an observed frame into virtual time
    pub fn tick(
        &mut self,
        elapsed: Elapsed,
        config: &ClockConfig,
        alignment: &AlignmentReading,
        active: bool,
    ) -> ClockTick {
        let speed_multiplier = Self::speed_multiplier(config, alignment, active);
        self.advance(elapsed.dt, speed_multiplier);

        ClockTick {
            dt: elapsed.dt,
            speed_multiplier,
            time_anomaly: elapsed.time_anomaly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlignmentMode;

    fn aligning() -> AlignmentReading {
        AlignmentReading {
            mode: AlignmentMode::Aligning,
            progress: 0.0,
        }
    }

    #[test]
    fn test_speed_selection() {
        let config = ClockConfig::default();
        let idle = AlignmentReading::default();

        assert_eq!(AnimationClock::speed_multiplier(&config, &aligning(), true), 3.0);
        assert_eq!(AnimationClock::speed_multiplier(&config, &aligning(), false), 3.0);
        assert_eq!(AnimationClock::speed_multiplier(&config, &idle, true), 2.0);
        assert_eq!(AnimationClock::speed_multiplier(&config, &idle, false), 1.0);
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = AnimationClock::default();
        clock.advance(0.5, 1.0);
        clock.advance(0.25, 2.0);
        clock.advance(0.1, 3.0);
        assert!((clock.virtual_time - (0.5 + 0.5 + 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_advance_ignores_negative_dt() {
        let mut clock = AnimationClock::default();
        clock.advance(1.0, 1.0);
        clock.advance(-5.0, 3.0);
        clock.advance(f64::NAN, 3.0);
        assert_eq!(clock.virtual_time, 1.0);
    }

    fn tick_at(clock: &mut AnimationClock, now_s: f64, active: bool) -> ClockTick {
        let elapsed = clock.observe(now_s);
        clock.tick(elapsed, &ClockConfig::default(), &AlignmentReading::default(), active)
    }

    #[test]
    fn test_tick_first_frame_credits_nothing() {
        let mut clock = AnimationClock::default();
        let tick = tick_at(&mut clock, 100.0, false);

        assert_eq!(tick.dt, 0.0);
        assert_eq!(clock.virtual_time, 0.0);
        assert_eq!(clock.session_s, 0.0);
        assert_eq!(clock.last_timestamp_s, Some(100.0));
    }

    #[test]
    fn test_tick_backwards_time() {
        let mut clock = AnimationClock::default();

        tick_at(&mut clock, 10.0, false);
        tick_at(&mut clock, 11.0, true);
        assert_eq!(clock.virtual_time, 2.0);

        let tick = tick_at(&mut clock, 10.5, true);
        assert!(tick.time_anomaly);
        assert_eq!(tick.dt, 0.0);
        assert_eq!(clock.virtual_time, 2.0);

        // Measurement restarts from the rewound timestamp
        let tick = tick_at(&mut clock, 11.5, false);
        assert_eq!(tick.dt, 1.0);
        assert_eq!(clock.virtual_time, 3.0);
        assert_eq!(clock.session_s, 2.0);
    }

    #[test]
    fn test_session_time_survives_clock_restart() {
        let mut clock = AnimationClock::default();
        clock.observe(1000.0);
        clock.observe(1000.5);

        let restart = clock.observe(0.0);
        assert!(restart.time_anomaly);

        for i in 1..=10 {
            let elapsed = clock.observe(i as f64);
            assert!(!elapsed.time_anomaly);
        }
        assert!((clock.session_s - 10.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_timestamp_keeps_baseline() {
        let mut clock = AnimationClock::default();
        clock.observe(2.0);

        let elapsed = clock.observe(f64::NAN);
        assert!(elapsed.time_anomaly);
        assert_eq!(clock.last_timestamp_s, Some(2.0));

        assert_eq!(clock.observe(2.5).dt, 0.5);
    }
}

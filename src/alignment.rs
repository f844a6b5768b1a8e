//! Alignment state machine
//!
//! Tracks sustained eye closure. After more than `debounce_frames` consecutive
//! closed-eye frames the session enters `Aligning` for a fixed hold duration,
//! during which a progress ramp climbs by a fixed step per frame.
//!
//! The ramp is tied to frame cadence while the exit is tied to wall-clock
//! seconds, so the progress reached before exit depends on the frame rate.

use tracing::{debug, info};

use crate::config::AlignmentConfig;
use crate::types::{AlignmentMode, AlignmentReading, AlignmentState};

/// Stateless driver for `AlignmentState`
#[derive(Debug, Clone, Default)]
pub struct AlignmentStateMachine {
    config: AlignmentConfig,
}

impl AlignmentStateMachine {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    /// Advance the state by one frame.
    ///
    /// `eye_openness` is None when no face was observed, which counts as open.
    /// `now_s` is session time; if it runs behind the phase start, the hold
    /// restarts from `now_s`.
    pub fn step(
        &self,
        state: &mut AlignmentState,
        eye_openness: Option<f64>,
        now_s: f64,
    ) -> AlignmentReading {
        let closed = eye_openness.is_some_and(|o| o < self.config.closed_eye_threshold);
        if closed {
            state.closed_frame_count = state.closed_frame_count.saturating_add(1);
        } else {
            if state.closed_frame_count > 0 {
                debug!(frames = state.closed_frame_count, "eye closure interrupted");
            }
            state.closed_frame_count = 0;
        }

        match state.mode {
            AlignmentMode::Idle if state.closed_frame_count > self.config.debounce_frames => {
                state.mode = AlignmentMode::Aligning;
                state.mode_start_s = Some(now_s);
                state.progress = 0.0;
                info!(at = now_s, "alignment started");
            }
            AlignmentMode::Idle => {}
            AlignmentMode::Aligning => {
                state.progress = (state.progress + self.config.progress_step).min(1.0);

                let started = match state.mode_start_s {
                    Some(started) if started <= now_s => started,
                    _ => {
                        debug!(at = now_s, from = ?state.mode_start_s, "alignment hold restarted");
                        state.mode_start_s = Some(now_s);
                        now_s
                    }
                };
                if now_s - started > self.config.hold_duration_s {
                    state.mode = AlignmentMode::Idle;
                    state.mode_start_s = None;
                    info!(at = now_s, progress = state.progress, "alignment finished");
                }
            }
        }

        state.reading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOSED: Option<f64> = Some(0.01);
    const OPEN: Option<f64> = Some(0.04);
    const FRAME_S: f64 = 1.0 / 30.0;

    /// Feed `count` frames starting at frame `start`, returning the last reading
    fn feed(
        machine: &AlignmentStateMachine,
        state: &mut AlignmentState,
        eye: Option<f64>,
        start: usize,
        count: usize,
    ) -> AlignmentReading {
        let mut reading = state.reading();
        for i in start..start + count {
            reading = machine.step(state, eye, i as f64 * FRAME_S);
        }
        reading
    }

    #[test]
    fn test_debounce_not_met() {
        let machine = AlignmentStateMachine::default();
        let mut state = AlignmentState::default();

        feed(&machine, &mut state, CLOSED, 0, 14);
        assert_eq!(state.closed_frame_count, 14);

        let reading = feed(&machine, &mut state, OPEN, 14, 1);
        assert_eq!(reading.mode, AlignmentMode::Idle);
        assert_eq!(state.closed_frame_count, 0);

        // A fresh run of 15 closed frames is still not enough
        let reading = feed(&machine, &mut state, CLOSED, 15, 15);
        assert_eq!(reading.mode, AlignmentMode::Idle);
    }

    #[test]
    fn test_enter_after_sixteen_closed_frames() {
        let machine = AlignmentStateMachine::default();
        let mut state = AlignmentState::default();

        let reading = feed(&machine, &mut state, CLOSED, 0, 15);
        assert_eq!(reading.mode, AlignmentMode::Idle);

        let reading = feed(&machine, &mut state, CLOSED, 15, 1);
        assert_eq!(reading.mode, AlignmentMode::Aligning);
        assert_eq!(reading.progress, 0.0);
        assert_eq!(state.mode_start_s, Some(15.0 * FRAME_S));

        for n in 1..=20 {
            let reading = feed(&machine, &mut state, CLOSED, 15 + n, 1);
            assert_eq!(reading.mode, AlignmentMode::Aligning);
            assert!((reading.progress - 0.01 * n as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_progress_caps_at_one() {
        let machine = AlignmentStateMachine::default();
        let mut state = AlignmentState::default();

        // 120 fps keeps the phase well inside the 8 s hold
        for i in 0..200 {
            machine.step(&mut state, CLOSED, i as f64 / 120.0);
        }
        assert_eq!(state.mode, AlignmentMode::Aligning);
        assert_eq!(state.progress, 1.0);
    }

    #[test]
    fn test_reopening_eyes_does_not_cancel() {
        let machine = AlignmentStateMachine::default();
        let mut state = AlignmentState::default();

        feed(&machine, &mut state, CLOSED, 0, 16);
        let reading = feed(&machine, &mut state, OPEN, 16, 30);
        assert_eq!(reading.mode, AlignmentMode::Aligning);
        assert_eq!(state.closed_frame_count, 0);
    }

    #[test]
    fn test_auto_exit_after_hold_duration() {
        let machine = AlignmentStateMachine::default();
        let mut state = AlignmentState::default();

        feed(&machine, &mut state, CLOSED, 0, 16);
        let start = state.mode_start_s.unwrap();

        let reading = machine.step(&mut state, CLOSED, start + 8.0);
        assert_eq!(reading.mode, AlignmentMode::Aligning);

        let reading = machine.step(&mut state, CLOSED, start + 8.01);
        assert_eq!(reading.mode, AlignmentMode::Idle);
        // Progress survives the exit until the next entry
        assert!(reading.progress > 0.0);

        // Eyes still closed: the next frame enters a fresh phase
        let reading = machine.step(&mut state, CLOSED, start + 8.05);
        assert_eq!(reading.mode, AlignmentMode::Aligning);
        assert_eq!(reading.progress, 0.0);
        assert_eq!(state.mode_start_s, Some(start + 8.05));
    }

    #[test]
    fn test_hold_ends_after_time_rewinds() {
        let machine = AlignmentStateMachine::default();
        let mut state = AlignmentState::default();

        for i in 0..16 {
            machine.step(&mut state, CLOSED, 1000.0 + i as f64 * FRAME_S);
        }
        assert_eq!(state.mode, AlignmentMode::Aligning);

        // Time restarts near zero; the hold still runs its full duration
        let reading = feed(&machine, &mut state, OPEN, 0, 240);
        assert_eq!(reading.mode, AlignmentMode::Aligning);
        assert_eq!(state.mode_start_s, Some(0.0));

        let reading = feed(&machine, &mut state, OPEN, 240, 2);
        assert_eq!(reading.mode, AlignmentMode::Idle);
    }

    #[test]
    fn test_missing_face_resets_counter() {
        let machine = AlignmentStateMachine::default();
        let mut state = AlignmentState::default();

        feed(&machine, &mut state, CLOSED, 0, 10);
        feed(&machine, &mut state, None, 10, 1);
        assert_eq!(state.closed_frame_count, 0);
        assert_eq!(state.mode, AlignmentMode::Idle);
    }
}

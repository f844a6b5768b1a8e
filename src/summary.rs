//! Session statistics
//!
//! Accumulates what happened over a session: how long it ran, how long was
//! spent aligning, which mudras were held and how good the posture was.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{AlignmentMode, FrameState, Mudra, PostureLabel, Zone};

/// Running session statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    frames: u64,
    first_timestamp_s: Option<f64>,
    last_timestamp_s: Option<f64>,
    aligning_frames: u64,
    alignment_entries: u64,
    mudra_frames: BTreeMap<Mudra, u64>,
    posture_frames: u64,
    posture_score_sum: f64,
    previous_mode: AlignmentMode,
    dominant_zone: Option<Zone>,
}

/// Snapshot of the session statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub frames: u64,
    /// Seconds between the first and latest frame
    pub duration_s: f64,
    /// Duration formatted as MM:SS
    pub session_time: String,
    pub aligning_frames: u64,
    pub alignment_entries: u64,
    pub mudra_frames: BTreeMap<Mudra, u64>,
    /// Mean posture score over frames with a body in view
    pub mean_posture_score: Option<f64>,
    /// Zone with the highest energy at the latest frame
    pub dominant_zone: Option<Zone>,
}

impl SessionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame into the statistics
    pub fn record(&mut self, frame: &FrameState) {
        self.frames += 1;
        if frame.timestamp_s.is_finite() {
            self.first_timestamp_s.get_or_insert(frame.timestamp_s);
            self.last_timestamp_s = Some(match self.last_timestamp_s {
                Some(last) => last.max(frame.timestamp_s),
                None => frame.timestamp_s,
            });
        }

        if frame.alignment.mode == AlignmentMode::Aligning {
            self.aligning_frames += 1;
            if self.previous_mode == AlignmentMode::Idle {
                self.alignment_entries += 1;
            }
        }
        self.previous_mode = frame.alignment.mode;

        if let Some(mudra) = frame.gesture.mudra {
            *self.mudra_frames.entry(mudra).or_insert(0) += 1;
        }

        if frame.posture.label != PostureLabel::NoBody {
            self.posture_frames += 1;
            self.posture_score_sum += frame.posture.score;
        }

        self.dominant_zone = Some(frame.energy.dominant_zone());
    }

    pub fn duration_s(&self) -> f64 {
        match (self.first_timestamp_s, self.last_timestamp_s) {
            (Some(first), Some(last)) => (last - first).max(0.0),
            _ => 0.0,
        }
    }

    pub fn report(&self) -> SessionReport {
        let duration_s = self.duration_s();
        SessionReport {
            frames: self.frames,
            duration_s,
            session_time: format_session_time(duration_s),
            aligning_frames: self.aligning_frames,
            alignment_entries: self.alignment_entries,
            mudra_frames: self.mudra_frames.clone(),
            mean_posture_score: (self.posture_frames > 0)
                .then(|| self.posture_score_sum / self.posture_frames as f64),
            dominant_zone: self.dominant_zone,
        }
    }
}

/// Format seconds as MM:SS (minutes keep counting past 59)
pub fn format_session_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AlignmentReading, AuraColor, EnergyVector, GestureResult, PostureResult, RenderHints,
    };
    use pretty_assertions::assert_eq;

    fn frame(index: u64, t: f64, mode: AlignmentMode, mudra: Option<Mudra>) -> FrameState {
        FrameState {
            frame_index: index,
            timestamp_s: t,
            energy: EnergyVector::default(),
            virtual_time: t,
            speed_multiplier: 1.0,
            posture: PostureResult {
                score: 0.8,
                label: PostureLabel::SlightTilt,
            },
            gesture: GestureResult {
                mudra,
                zone: mudra.map(|m| m.zone()),
                is_primary_focus: false,
            },
            alignment: AlignmentReading {
                mode,
                progress: 0.0,
            },
            face_anchor_x: None,
            hints: RenderHints {
                aura: AuraColor::White,
                revolving_aura: false,
                sparkles: false,
                highlight_zone: None,
                info_mudra: mudra,
            },
            flags: vec![],
        }
    }

    #[test]
    fn test_format_session_time() {
        assert_eq!(format_session_time(0.0), "00:00");
        assert_eq!(format_session_time(65.9), "01:05");
        assert_eq!(format_session_time(3600.0), "60:00");
        assert_eq!(format_session_time(-3.0), "00:00");
    }

    #[test]
    fn test_counts_alignment_entries() {
        let mut summary = SessionSummary::new();
        let modes = [
            AlignmentMode::Idle,
            AlignmentMode::Aligning,
            AlignmentMode::Aligning,
            AlignmentMode::Idle,
            AlignmentMode::Aligning,
        ];
        for (i, mode) in modes.into_iter().enumerate() {
            summary.record(&frame(i as u64, i as f64 * 0.5, mode, None));
        }

        let report = summary.report();
        assert_eq!(report.frames, 5);
        assert_eq!(report.aligning_frames, 3);
        assert_eq!(report.alignment_entries, 2);
        assert_eq!(report.duration_s, 2.0);
        assert_eq!(report.session_time, "00:02");
    }

    #[test]
    fn test_mudra_and_posture_stats() {
        let mut summary = SessionSummary::new();
        summary.record(&frame(0, 0.0, AlignmentMode::Idle, Some(Mudra::Gyan)));
        summary.record(&frame(1, 0.1, AlignmentMode::Idle, Some(Mudra::Gyan)));
        summary.record(&frame(2, 0.2, AlignmentMode::Idle, Some(Mudra::Anjali)));

        let mut no_body = frame(3, 0.3, AlignmentMode::Idle, None);
        no_body.posture = PostureResult::no_body();
        summary.record(&no_body);

        let report = summary.report();
        assert_eq!(report.mudra_frames.get(&Mudra::Gyan), Some(&2));
        assert_eq!(report.mudra_frames.get(&Mudra::Anjali), Some(&1));
        assert!((report.mean_posture_score.unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(report.dominant_zone, Some(Zone::Root));
    }

    #[test]
    fn test_empty_report() {
        let report = SessionSummary::new().report();
        assert_eq!(report.frames, 0);
        assert_eq!(report.mean_posture_score, None);
        assert_eq!(report.session_time, "00:00");
    }
}

//! Posture analysis
//!
//! Scores upper-body alignment from the shoulder and hip landmarks of a pose.

use crate::config::PostureConfig;
use crate::features::FeatureExtractor;
use crate::types::{PoseObservation, PostureLabel, PostureResult};

pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

/// Posture analyzer scoring spine tilt and shoulder level
#[derive(Debug, Clone, Default)]
pub struct PostureAnalyzer {
    config: PostureConfig,
}

impl PostureAnalyzer {
    pub fn new(config: PostureConfig) -> Self {
        Self { config }
    }

    /// Assess a pose. Absent or incomplete poses yield the "No body" result.
    pub fn assess(&self, pose: Option<&PoseObservation>) -> PostureResult {
        let Some(pose) = pose else {
            return PostureResult::no_body();
        };

        let (Some(ls), Some(rs), Some(lh), Some(rh)) = (
            pose.landmark(LEFT_SHOULDER),
            pose.landmark(RIGHT_SHOULDER),
            pose.landmark(LEFT_HIP),
            pose.landmark(RIGHT_HIP),
        ) else {
            return PostureResult::no_body();
        };

        let shoulder_mid = FeatureExtractor::midpoint(ls, rs);
        let hip_mid = FeatureExtractor::midpoint(lh, rh);

        let spine_angle = FeatureExtractor::vertical_angle_deg(&shoulder_mid, &hip_mid).abs();
        let shoulder_level = (ls.y - rs.y).abs();

        let score = self.score(spine_angle, shoulder_level);
        PostureResult {
            score,
            label: self.label(score),
        }
    }

    fn score(&self, spine_angle: f64, shoulder_level: f64) -> f64 {
        let cfg = &self.config;

        let spine_penalty = ((spine_angle - cfg.spine_tolerance_deg).max(0.0)
            / cfg.spine_penalty_span_deg)
            .min(cfg.max_spine_penalty);
        let shoulder_penalty = ((shoulder_level - cfg.shoulder_tolerance).max(0.0)
            / cfg.shoulder_penalty_span)
            .min(cfg.max_shoulder_penalty);

        let score = 1.0 - spine_penalty - shoulder_penalty;
        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn label(&self, score: f64) -> PostureLabel {
        if score > self.config.aligned_above {
            PostureLabel::Aligned
        } else if score > self.config.slight_tilt_above {
            PostureLabel::SlightTilt
        } else {
            PostureLabel::PoorPosture
        }
    }
}

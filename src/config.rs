//! Session configuration
//!
//! Thresholds and rates for every stage of the session. Defaults reproduce the
//! reference behavior; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// Posture scoring thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Spine tilt (degrees) tolerated before penalties apply
    pub spine_tolerance_deg: f64,
    /// Degrees of extra tilt that cost a full point of score
    pub spine_penalty_span_deg: f64,
    /// Cap on the spine penalty
    pub max_spine_penalty: f64,
    /// Shoulder height difference tolerated before penalties apply
    pub shoulder_tolerance: f64,
    /// Extra shoulder difference that costs a full point of score
    pub shoulder_penalty_span: f64,
    /// Cap on the shoulder penalty
    pub max_shoulder_penalty: f64,
    /// Scores above this are "Aligned"
    pub aligned_above: f64,
    /// Scores above this (and not aligned) are "Slight tilt"
    pub slight_tilt_above: f64,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            spine_tolerance_deg: 10.0,
            spine_penalty_span_deg: 40.0,
            max_spine_penalty: 0.5,
            shoulder_tolerance: 0.03,
            shoulder_penalty_span: 0.1,
            max_shoulder_penalty: 0.3,
            aligned_above: 0.8,
            slight_tilt_above: 0.6,
        }
    }
}

/// Gesture classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Maximum wrist distance for the two-hand prayer gesture
    pub prayer_wrist_distance: f64,
    /// Maximum thumb-tip to index-tip distance for the wisdom gesture
    pub wisdom_pinch_distance: f64,
    /// Also classify the remaining catalogue mudras
    pub extended_catalogue: bool,
    /// Maximum fingertip spread for the extended mudras
    pub cluster_distance: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            prayer_wrist_distance: 0.2,
            wisdom_pinch_distance: 0.05,
            extended_catalogue: false,
            cluster_distance: 0.05,
        }
    }
}

/// Eye-closure debounce and alignment timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Eye openness below this counts as closed
    pub closed_eye_threshold: f64,
    /// Consecutive closed frames that must be exceeded to start aligning
    pub debounce_frames: u32,
    /// Progress added per frame while aligning
    pub progress_step: f64,
    /// Seconds an aligning phase lasts
    pub hold_duration_s: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            closed_eye_threshold: 0.022,
            debounce_frames: 15,
            progress_step: 0.01,
            hold_duration_s: 8.0,
        }
    }
}

/// Energy growth and decay rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Per-frame gain of the zone bound to the active gesture
    pub focus_growth: f64,
    /// Per-frame loss of the other zones while a gesture is held
    pub focus_decay: f64,
    /// Floor for zones decaying under a gesture
    pub focus_floor: f64,
    /// Per-frame loss of every zone when nothing is happening
    pub idle_decay: f64,
    /// Floor for idle decay
    pub idle_floor: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            focus_growth: 0.02,
            focus_decay: 0.004,
            focus_floor: 0.1,
            idle_decay: 0.015,
            idle_floor: 0.05,
        }
    }
}

/// Animation clock speeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub aligning_speed: f64,
    pub active_speed: f64,
    pub idle_speed: f64,
    /// Posture score above which the practitioner counts as active
    pub activity_posture_threshold: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            aligning_speed: 3.0,
            active_speed: 2.0,
            idle_speed: 1.0,
            activity_posture_threshold: 0.1,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub posture: PostureConfig,
    pub gesture: GestureConfig,
    pub alignment: AlignmentConfig,
    pub energy: EnergyConfig,
    pub clock: ClockConfig,
}

impl SessionConfig {
    /// Load and validate a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject values that would break the energy or clock invariants
    pub fn validate(&self) -> Result<(), ComputeError> {
        let energy = &self.energy;
        if !(0.0..=1.0).contains(&energy.idle_floor) || !(0.0..=1.0).contains(&energy.focus_floor)
        {
            return Err(ComputeError::InvalidConfig(
                "energy floors must lie in [0, 1]".to_string(),
            ));
        }
        if energy.focus_growth < 0.0 || energy.focus_decay < 0.0 || energy.idle_decay < 0.0 {
            return Err(ComputeError::InvalidConfig(
                "energy rates must be non-negative".to_string(),
            ));
        }

        let clock = &self.clock;
        if clock.aligning_speed < 0.0 || clock.active_speed < 0.0 || clock.idle_speed < 0.0 {
            return Err(ComputeError::InvalidConfig(
                "clock speeds must be non-negative".to_string(),
            ));
        }

        let alignment = &self.alignment;
        if alignment.progress_step < 0.0 || alignment.hold_duration_s < 0.0 {
            return Err(ComputeError::InvalidConfig(
                "alignment step and hold duration must be non-negative".to_string(),
            ));
        }

        let posture = &self.posture;
        if posture.spine_penalty_span_deg <= 0.0 || posture.shoulder_penalty_span <= 0.0 {
            return Err(ComputeError::InvalidConfig(
                "posture penalty spans must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_override() {
        let json = r#"{ "alignment": { "debounce_frames": 30 }, "gesture": { "extended_catalogue": true } }"#;
        let config = SessionConfig::from_json(json).unwrap();

        assert_eq!(config.alignment.debounce_frames, 30);
        assert_eq!(config.alignment.hold_duration_s, 8.0);
        assert!(config.gesture.extended_catalogue);
        assert_eq!(config.energy, EnergyConfig::default());
    }

    #[test]
    fn test_round_trip_defaults() {
        let config = SessionConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SessionConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_negative_speed() {
        let json = r#"{ "clock": { "idle_speed": -1.0 } }"#;
        assert!(matches!(
            SessionConfig::from_json(json),
            Err(ComputeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_floor_out_of_range() {
        let json = r#"{ "energy": { "idle_floor": 1.5 } }"#;
        assert!(SessionConfig::from_json(json).is_err());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SessionConfig::from_json("not json"),
            Err(ComputeError::JsonError(_))
        ));
    }
}

//! mudra.frame.v1 schema definition
//!
//! One record per captured video frame, carrying the landmark sets produced
//! by the perception pipeline:
//! - Up to two hands of 21 landmarks each
//! - At most one face mesh
//! - At most one body pose

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Landmark;

/// Current schema version
pub const SCHEMA_VERSION: &str = "mudra.frame.v1";

/// A single frame of landmark observations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Schema version (must be "mudra.frame.v1")
    pub schema_version: String,
    /// Optional identifier assigned by the capture side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    /// Monotonic capture time (seconds)
    pub timestamp_s: f64,
    /// Wall-clock capture time, for provenance only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
    /// Hand landmark sets in detection order
    #[serde(default)]
    pub hands: Vec<Vec<Landmark>>,
    /// Face mesh landmarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<Vec<Landmark>>,
    /// Body pose landmarks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Vec<Landmark>>,
}

impl FrameRecord {
    /// Create an empty frame at the given timestamp
    pub fn new(timestamp_s: f64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            frame_id: None,
            timestamp_s,
            captured_at: None,
            hands: Vec::new(),
            face: None,
            pose: None,
        }
    }

    pub fn with_frame_id(mut self, frame_id: impl Into<String>) -> Self {
        self.frame_id = Some(frame_id.into());
        self
    }

    pub fn with_captured_at(mut self, captured_at: DateTime<Utc>) -> Self {
        self.captured_at = Some(captured_at);
        self
    }

    pub fn with_hand(mut self, landmarks: Vec<Landmark>) -> Self {
        self.hands.push(landmarks);
        self
    }

    pub fn with_face(mut self, landmarks: Vec<Landmark>) -> Self {
        self.face = Some(landmarks);
        self
    }

    pub fn with_pose(mut self, landmarks: Vec<Landmark>) -> Self {
        self.pose = Some(landmarks);
        self
    }

    /// Validate the record envelope.
    ///
    /// Landmark contents are not checked here; malformed observations are
    /// dropped during adaptation instead of rejecting the frame.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ValidationError::InvalidSchemaVersion {
                expected: SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }

        if !self.timestamp_s.is_finite() {
            return Err(ValidationError::InvalidTimestamp(self.timestamp_s));
        }

        Ok(())
    }
}

/// Validation errors for frame records
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid schema version: expected {expected}, got {actual}")]
    InvalidSchemaVersion { expected: String, actual: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_frame() {
        let record = FrameRecord::new(1.5)
            .with_frame_id("f-1")
            .with_hand(vec![Landmark::new(0.5, 0.5); 21]);
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("mudra.frame.v1"));
        assert!(json.contains("\"frame_id\":\"f-1\""));
        assert!(!json.contains("\"face\""));
    }

    #[test]
    fn test_deserialize_minimal_frame() {
        let json = r#"{"schema_version":"mudra.frame.v1","timestamp_s":0.25}"#;
        let record: FrameRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.timestamp_s, 0.25);
        assert!(record.hands.is_empty());
        assert!(record.face.is_none());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_landmark_depth_optional() {
        let json = r#"{"schema_version":"mudra.frame.v1","timestamp_s":0.0,"hands":[[{"x":0.1,"y":0.2}]]}"#;
        let record: FrameRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.hands[0][0], Landmark::new(0.1, 0.2));
    }

    #[test]
    fn test_invalid_schema_version() {
        let mut record = FrameRecord::new(0.0);
        record.schema_version = "wear.raw_event.v1".to_string();
        assert!(matches!(
            record.validate(),
            Err(ValidationError::InvalidSchemaVersion { .. })
        ));
    }

    #[test]
    fn test_invalid_timestamp() {
        let record = FrameRecord::new(f64::INFINITY);
        assert!(matches!(
            record.validate(),
            Err(ValidationError::InvalidTimestamp(_))
        ));
    }
}

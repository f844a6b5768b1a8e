//! Adapter for converting mudra.frame.v1 records into `FrameInput`
//!
//! Malformed observations are dropped and flagged rather than failing the
//! frame, so one bad detection never halts a session.

use tracing::warn;

use crate::error::ComputeError;
use crate::features::LEFT_EYE_TOP;
use crate::posture::RIGHT_HIP;
use crate::schema::frame::*;
use crate::types::{
    FaceObservation, FrameInput, HandObservation, Landmark, ObservationFlag, PoseObservation,
    HAND_LANDMARK_COUNT,
};

/// Maximum hands considered per frame
pub const MAX_HANDS: usize = 2;

/// Smallest face mesh that contains every landmark the core reads
pub const MIN_FACE_LANDMARKS: usize = LEFT_EYE_TOP + 1;

/// Smallest pose that contains every landmark the core reads
pub const MIN_POSE_LANDMARKS: usize = RIGHT_HIP + 1;

/// Adapter for converting frame records to pipeline input
pub struct FrameAdapter;

impl FrameAdapter {
    /// Parse a JSON string containing an array of FrameRecords
    pub fn parse_array(json: &str) -> Result<Vec<FrameRecord>, ComputeError> {
        let records: Vec<FrameRecord> = serde_json::from_str(json)?;
        Ok(records)
    }

    /// Parse NDJSON (newline-delimited JSON) containing FrameRecords
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<FrameRecord>, ComputeError> {
        let mut records = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<FrameRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    return Err(ComputeError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(records)
    }

    /// Convert a record into pipeline input.
    ///
    /// Only an invalid envelope is an error; bad observations become flags.
    pub fn to_input(record: &FrameRecord) -> Result<FrameInput, ComputeError> {
        record.validate()?;

        let mut flags = Vec::new();

        let mut hands = Vec::with_capacity(MAX_HANDS);
        for landmarks in &record.hands {
            if landmarks.len() != HAND_LANDMARK_COUNT || !all_finite(landmarks) {
                warn!(
                    frame = ?record.frame_id,
                    landmarks = landmarks.len(),
                    "dropping malformed hand observation"
                );
                push_flag(&mut flags, ObservationFlag::MalformedHand);
                continue;
            }
            if hands.len() == MAX_HANDS {
                push_flag(&mut flags, ObservationFlag::ExtraHandsDropped);
                continue;
            }
            hands.push(HandObservation::new(landmarks.clone()));
        }

        let face = match &record.face {
            Some(landmarks) if landmarks.len() >= MIN_FACE_LANDMARKS && all_finite(landmarks) => {
                Some(FaceObservation::new(landmarks.clone()))
            }
            Some(landmarks) => {
                warn!(
                    frame = ?record.frame_id,
                    landmarks = landmarks.len(),
                    "dropping malformed face observation"
                );
                push_flag(&mut flags, ObservationFlag::MalformedFace);
                None
            }
            None => None,
        };

        let pose = match &record.pose {
            Some(landmarks) if landmarks.len() >= MIN_POSE_LANDMARKS && all_finite(landmarks) => {
                Some(PoseObservation::new(landmarks.clone()))
            }
            Some(landmarks) => {
                warn!(
                    frame = ?record.frame_id,
                    landmarks = landmarks.len(),
                    "dropping malformed pose observation"
                );
                push_flag(&mut flags, ObservationFlag::MalformedPose);
                None
            }
            None => None,
        };

        Ok(FrameInput {
            timestamp_s: record.timestamp_s,
            hands,
            face,
            pose,
            flags,
        })
    }

    /// Validate a batch of records
    pub fn validate_records(records: &[FrameRecord]) -> Vec<ValidationResult> {
        records
            .iter()
            .enumerate()
            .map(|(idx, record)| ValidationResult {
                index: idx,
                frame_id: record.frame_id.clone(),
                result: record.validate().err(),
            })
            .filter(|r| r.result.is_some())
            .collect()
    }
}

/// Result of record validation
#[derive(Debug)]
pub struct ValidationResult {
    pub index: usize,
    pub frame_id: Option<String>,
    pub result: Option<ValidationError>,
}

fn all_finite(landmarks: &[Landmark]) -> bool {
    landmarks.iter().all(Landmark::is_finite)
}

fn push_flag(flags: &mut Vec<ObservationFlag>, flag: ObservationFlag) {
    if !flags.contains(&flag) {
        flags.push(flag);
    }
}

//! Feature extraction
//!
//! This module computes the scalar geometric features the classifiers work on:
//! - Planar landmark distances and midpoints
//! - Angle of a segment against the vertical image axis
//! - Eye openness and horizontal face anchor

use crate::types::{FaceObservation, FrameInput, Landmark};

/// Guard added to denominators so degenerate geometry never divides by zero
pub const EPSILON: f64 = 1e-6;

/// Face mesh index of the left eye's upper lid
pub const LEFT_EYE_TOP: usize = 159;
/// Face mesh index of the left eye's lower lid
pub const LEFT_EYE_BOTTOM: usize = 145;
/// Face mesh index of the nose tip, used as horizontal anchor
pub const NOSE_TIP: usize = 1;

/// Features derived from the face observation of one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameFeatures {
    /// Lid distance; None when no usable face was observed
    pub eye_openness: Option<f64>,
    /// Normalized x of the nose tip
    pub face_anchor_x: Option<f64>,
}

/// Feature extractor for computing geometric signals from landmarks
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Extract the per-frame face features
    pub fn extract(frame: &FrameInput) -> FrameFeatures {
        let face = frame.face.as_ref();
        FrameFeatures {
            eye_openness: face.and_then(eye_openness),
            face_anchor_x: face.and_then(face_anchor_x),
        }
    }

    /// Euclidean distance in the image plane
    pub fn distance(a: &Landmark, b: &Landmark) -> f64 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
        Landmark {
            x: (a.x + b.x) * 0.5,
            y: (a.y + b.y) * 0.5,
            z: (a.z + b.z) * 0.5,
        }
    }

    /// Signed angle (degrees) between `from -> to` and the downward vertical.
    ///
    /// Positive when `to` lies to the right of `from`. A segment pointing
    /// straight down the image yields 0.
    pub fn vertical_angle_deg(from: &Landmark, to: &Landmark) -> f64 {
        let dx = to.x - from.x;
        let dy = to.y - from.y + EPSILON;
        let angle = dx.atan2(dy).to_degrees();
        if angle.is_finite() {
            angle
        } else {
            0.0
        }
    }
}

/// Distance between the upper and lower lid of the left eye
fn eye_openness(face: &FaceObservation) -> Option<f64> {
    match (face.landmark(LEFT_EYE_TOP), face.landmark(LEFT_EYE_BOTTOM)) {
        (Some(top), Some(bottom)) => Some(FeatureExtractor::distance(top, bottom)),
        _ => None,
    }
}

fn face_anchor_x(face: &FaceObservation) -> Option<f64> {
    face.landmark(NOSE_TIP).map(|nose| nose.x)
}

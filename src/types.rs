//! Core types for the Synheart Mudra pipeline
//!
//! This module defines the data structures that flow through each stage of a
//! session: landmark observations in, derived per-frame results, and the
//! frame state handed to the renderer.

use serde::{Deserialize, Serialize};

/// Number of energy zones tracked per session
pub const ZONE_COUNT: usize = 7;

/// Number of landmarks in a hand observation
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Energy every zone starts a session with
pub const INITIAL_ZONE_ENERGY: f64 = 0.4;

/// A normalized landmark position, coordinates in [0, 1] relative to the frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Relative depth, unused by the planar features
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One tracked hand (21 landmarks, wrist first)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}

/// One tracked face mesh
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceObservation {
    pub landmarks: Vec<Landmark>,
}

impl FaceObservation {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}

/// One tracked body pose
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseObservation {
    pub landmarks: Vec<Landmark>,
}

impl PoseObservation {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}

/// Observation issues recorded for a frame. None of these fail the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationFlag {
    MissingHands,
    MissingFace,
    MissingPose,
    MalformedHand,
    MalformedFace,
    MalformedPose,
    ExtraHandsDropped,
    NonMonotonicTime,
}

/// Everything the core consumes for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Monotonic timestamp (seconds)
    pub timestamp_s: f64,
    /// Zero, one or two hands
    #[serde(default)]
    pub hands: Vec<HandObservation>,
    #[serde(default)]
    pub face: Option<FaceObservation>,
    #[serde(default)]
    pub pose: Option<PoseObservation>,
    /// Issues found while adapting the wire record
    #[serde(default)]
    pub flags: Vec<ObservationFlag>,
}

impl FrameInput {
    pub fn at(timestamp_s: f64) -> Self {
        Self {
            timestamp_s,
            ..Default::default()
        }
    }

    pub fn with_hands(mut self, hands: Vec<HandObservation>) -> Self {
        self.hands = hands;
        self
    }

    pub fn with_face(mut self, face: FaceObservation) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_pose(mut self, pose: PoseObservation) -> Self {
        self.pose = Some(pose);
        self
    }
}

/// Body-aligned energy zones, bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Root,
    Sacral,
    SolarPlexus,
    Heart,
    Throat,
    ThirdEye,
    Crown,
}

impl Zone {
    pub const ALL: [Zone; ZONE_COUNT] = [
        Zone::Root,
        Zone::Sacral,
        Zone::SolarPlexus,
        Zone::Heart,
        Zone::Throat,
        Zone::ThirdEye,
        Zone::Crown,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Zone> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Root => "root",
            Zone::Sacral => "sacral",
            Zone::SolarPlexus => "solar_plexus",
            Zone::Heart => "heart",
            Zone::Throat => "throat",
            Zone::ThirdEye => "third_eye",
            Zone::Crown => "crown",
        }
    }
}

/// Named hand mudras known to the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mudra {
    Gyan,
    Prana,
    Apana,
    Surya,
    Varun,
    Anjali,
}

impl Mudra {
    pub const ALL: [Mudra; 6] = [
        Mudra::Gyan,
        Mudra::Prana,
        Mudra::Apana,
        Mudra::Surya,
        Mudra::Varun,
        Mudra::Anjali,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mudra::Gyan => "gyan",
            Mudra::Prana => "prana",
            Mudra::Apana => "apana",
            Mudra::Surya => "surya",
            Mudra::Varun => "varun",
            Mudra::Anjali => "anjali",
        }
    }

    /// Zone whose energy the mudra feeds
    pub fn zone(&self) -> Zone {
        match self {
            Mudra::Gyan => Zone::Crown,
            Mudra::Anjali => Zone::Throat,
            Mudra::Prana => Zone::Root,
            Mudra::Apana | Mudra::Varun => Zone::Sacral,
            Mudra::Surya => Zone::SolarPlexus,
        }
    }
}

/// Gesture recognized in the current frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureResult {
    pub mudra: Option<Mudra>,
    /// Zone the gesture feeds
    pub zone: Option<Zone>,
    /// Whether the gesture counts as focused activity for the clock
    pub is_primary_focus: bool,
}

impl GestureResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.mudra.is_some()
    }
}

/// Posture quality category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureLabel {
    NoBody,
    Aligned,
    SlightTilt,
    PoorPosture,
}

impl PostureLabel {
    /// Display text
    pub fn as_str(&self) -> &'static str {
        match self {
            PostureLabel::NoBody => "No body",
            PostureLabel::Aligned => "Aligned",
            PostureLabel::SlightTilt => "Slight tilt",
            PostureLabel::PoorPosture => "Poor posture",
        }
    }
}

/// Posture assessment for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostureResult {
    /// Alignment score (0-1)
    pub score: f64,
    pub label: PostureLabel,
}

impl PostureResult {
    pub fn no_body() -> Self {
        Self {
            score: 0.0,
            label: PostureLabel::NoBody,
        }
    }
}

/// Alignment phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    #[default]
    Idle,
    Aligning,
}

/// Persistent alignment tracking state, one per session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentState {
    pub mode: AlignmentMode,
    /// Ramp (0-1), reset only when Aligning is entered again
    pub progress: f64,
    /// Consecutive frames with closed eyes
    pub closed_frame_count: u32,
    /// Timestamp the current Aligning phase started (seconds)
    pub mode_start_s: Option<f64>,
}

impl AlignmentState {
    pub fn reading(&self) -> AlignmentReading {
        AlignmentReading {
            mode: self.mode,
            progress: self.progress,
        }
    }
}

/// What downstream consumers see of the alignment state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentReading {
    pub mode: AlignmentMode,
    pub progress: f64,
}

impl AlignmentReading {
    pub fn is_aligning(&self) -> bool {
        self.mode == AlignmentMode::Aligning
    }
}

/// Per-zone energy levels, indexed by `Zone`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnergyVector([f64; ZONE_COUNT]);

impl Default for EnergyVector {
    fn default() -> Self {
        Self([INITIAL_ZONE_ENERGY; ZONE_COUNT])
    }
}

impl EnergyVector {
    pub fn get(&self, zone: Zone) -> f64 {
        self.0[zone.index()]
    }

    pub fn values(&self) -> [f64; ZONE_COUNT] {
        self.0
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f64; ZONE_COUNT] {
        &mut self.0
    }

    /// Zone with the highest energy (lowest zone wins ties)
    pub fn dominant_zone(&self) -> Zone {
        let mut best = Zone::Root;
        for zone in Zone::ALL {
            if self.get(zone) > self.get(best) {
                best = zone;
            }
        }
        best
    }
}

/// Aura tint chosen for the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuraColor {
    Golden,
    White,
}

impl AuraColor {
    /// BGR triple used by the renderer
    pub fn bgr(&self) -> [u8; 3] {
        match self {
            AuraColor::Golden => [0, 215, 255],
            AuraColor::White => [255, 255, 255],
        }
    }
}

/// Visual cues derived from the frame state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderHints {
    pub aura: AuraColor,
    /// Orbiting particles above the practitioner
    pub revolving_aura: bool,
    /// Sparkles around the aura while the focus gesture is held
    pub sparkles: bool,
    /// Zone to ring with a highlight
    pub highlight_zone: Option<Zone>,
    /// Mudra whose info panel should be shown
    pub info_mudra: Option<Mudra>,
}

/// Frame state produced for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    pub frame_index: u64,
    pub timestamp_s: f64,
    pub energy: EnergyVector,
    pub virtual_time: f64,
    pub speed_multiplier: f64,
    pub posture: PostureResult,
    pub gesture: GestureResult,
    pub alignment: AlignmentReading,
    /// Horizontal anchor (nose) for centering visuals, if a face was seen
    pub face_anchor_x: Option<f64>,
    pub hints: RenderHints,
    pub flags: Vec<ObservationFlag>,
}

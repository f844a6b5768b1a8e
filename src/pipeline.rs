//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Mudra.
//! Each frame flows through feature extraction, posture and gesture
//! classification, the alignment state machine, the energy engine and the
//! animation clock, and comes out as one `FrameState`.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::alignment::AlignmentStateMachine;
use crate::catalogue::Catalogue;
use crate::clock::AnimationClock;
use crate::config::SessionConfig;
use crate::encoder::FrameEncoder;
use crate::energy::EnergyEngine;
use crate::error::ComputeError;
use crate::features::FeatureExtractor;
use crate::gesture::GestureClassifier;
use crate::posture::PostureAnalyzer;
use crate::schema::{FrameAdapter, FrameRecord};
use crate::summary::{SessionReport, SessionSummary};
use crate::types::{
    AlignmentReading, AlignmentState, AuraColor, EnergyVector, FrameInput, FrameState,
    GestureResult, ObservationFlag, RenderHints,
};

/// Convert a JSON array of frame records to state payloads (stateless, one-shot).
///
/// # Arguments
/// * `frames_json` - JSON array of `mudra.frame.v1` records, in capture order
///
/// # Returns
/// One `mudra.state.v1` JSON payload per frame
///
/// # Example
/// ```ignore
/// let payloads = frames_to_states(frames_json)?;
/// ```
pub fn frames_to_states(frames_json: String) -> Result<Vec<String>, ComputeError> {
    let records = FrameAdapter::parse_array(&frames_json)?;

    let mut session = MudraSession::new();
    let mut payloads = Vec::with_capacity(records.len());
    for record in &records {
        let state = session.process_record(record)?;
        payloads.push(
            session
                .encoder
                .encode_to_json(&state, record.frame_id.as_deref())?,
        );
    }

    Ok(payloads)
}

/// The persistent, mutable state of one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub energy: EnergyVector,
    pub alignment: AlignmentState,
    pub clock: AnimationClock,
}

/// Stateful processor for one meditation session.
///
/// Feed frames in capture order; drop the session to end it.
pub struct MudraSession {
    config: SessionConfig,
    posture: PostureAnalyzer,
    gesture: GestureClassifier,
    alignment: AlignmentStateMachine,
    energy: EnergyEngine,
    encoder: FrameEncoder,
    state: SessionState,
    summary: SessionSummary,
    frame_index: u64,
}

impl Default for MudraSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MudraSession {
    /// Create a new session with default settings
    pub fn new() -> Self {
        Self::build(SessionConfig::default())
    }

    /// Create a session with a specific configuration, rejecting invalid settings
    pub fn with_config(config: SessionConfig) -> Result<Self, ComputeError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a session from a JSON configuration document
    pub fn from_config_json(json: &str) -> Result<Self, ComputeError> {
        Ok(Self::build(SessionConfig::from_json(json)?))
    }

    fn build(config: SessionConfig) -> Self {
        Self {
            posture: PostureAnalyzer::new(config.posture.clone()),
            gesture: GestureClassifier::new(config.gesture.clone()),
            alignment: AlignmentStateMachine::new(config.alignment.clone()),
            energy: EnergyEngine::new(config.energy.clone()),
            encoder: FrameEncoder::new(),
            state: SessionState::default(),
            summary: SessionSummary::new(),
            frame_index: 0,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only view of the persistent session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn frames_processed(&self) -> u64 {
        self.frame_index
    }

    /// Process one frame of observations
    pub fn process_frame(&mut self, frame: &FrameInput) -> FrameState {
        let now_s = if frame.timestamp_s.is_finite() {
            frame.timestamp_s
        } else {
            self.state.clock.last_timestamp_s.unwrap_or(0.0)
        };

        // Stage 1: Extract features
        let features = FeatureExtractor::extract(frame);

        // Stage 2: Classify posture and gesture
        let posture = self.posture.assess(frame.pose.as_ref());
        let gesture = self.gesture.classify(&frame.hands);

        // Stage 3: Advance the alignment state machine on session time
        let elapsed = self.state.clock.observe(frame.timestamp_s);
        let alignment = self.alignment.step(
            &mut self.state.alignment,
            features.eye_openness,
            self.state.clock.session_s,
        );

        // Stage 4: Update zone energies
        let regime = self.energy.update(&mut self.state.energy, &gesture, &alignment);

        // Stage 5: Advance the animation clock
        let active = gesture.is_primary_focus
            || posture.score > self.config.clock.activity_posture_threshold;
        let tick = self
            .state
            .clock
            .tick(elapsed, &self.config.clock, &alignment, active);

        let flags = collect_flags(frame, tick.time_anomaly);
        let state = FrameState {
            frame_index: self.frame_index,
            timestamp_s: now_s,
            energy: self.state.energy,
            virtual_time: self.state.clock.virtual_time,
            speed_multiplier: tick.speed_multiplier,
            posture,
            gesture,
            alignment,
            face_anchor_x: features.face_anchor_x,
            hints: render_hints(&gesture, &alignment, active),
            flags,
        };

        trace!(
            frame = self.frame_index,
            ?regime,
            mode = ?alignment.mode,
            virtual_time = state.virtual_time,
            "frame processed"
        );

        self.summary.record(&state);
        self.frame_index += 1;
        state
    }

    /// Adapt and process one wire record
    pub fn process_record(&mut self, record: &FrameRecord) -> Result<FrameState, ComputeError> {
        let input = FrameAdapter::to_input(record)?;
        Ok(self.process_frame(&input))
    }

    /// Process one JSON frame record and return the JSON state payload
    pub fn process_json(&mut self, frame_json: &str) -> Result<String, ComputeError> {
        let record: FrameRecord = serde_json::from_str(frame_json)?;
        let state = self.process_record(&record)?;
        self.encoder
            .encode_to_json(&state, record.frame_id.as_deref())
    }

    /// Statistics for the session so far
    pub fn summary(&self) -> SessionReport {
        self.summary.report()
    }

    /// Display catalogue matching this session's classifier
    pub fn catalogue(&self) -> Catalogue {
        Catalogue::new(&self.gesture)
    }

    /// Encoder used for this session's payloads
    pub fn encoder(&self) -> &FrameEncoder {
        &self.encoder
    }
}

fn collect_flags(frame: &FrameInput, time_anomaly: bool) -> Vec<ObservationFlag> {
    let mut flags = frame.flags.clone();
    let mut add = |flag| {
        if !flags.contains(&flag) {
            flags.push(flag);
        }
    };

    if frame.hands.is_empty() {
        add(ObservationFlag::MissingHands);
    }
    if frame.face.is_none() {
        add(ObservationFlag::MissingFace);
    }
    if frame.pose.is_none() {
        add(ObservationFlag::MissingPose);
    }
    if time_anomaly {
        debug!(timestamp = frame.timestamp_s, "frame flagged for non-monotonic time");
        add(ObservationFlag::NonMonotonicTime);
    }

    flags
}

fn render_hints(gesture: &GestureResult, alignment: &AlignmentReading, active: bool) -> RenderHints {
    let aligning = alignment.is_aligning();
    RenderHints {
        aura: if active && !aligning {
            AuraColor::Golden
        } else {
            AuraColor::White
        },
        revolving_aura: active && !aligning,
        sparkles: gesture.is_primary_focus && !aligning,
        highlight_zone: gesture.zone,
        info_mudra: gesture.mudra,
    }
}

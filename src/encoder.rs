//! Frame state encoding
//!
//! This module wraps per-frame state into `mudra.state.v1` payloads with
//! producer and provenance metadata for the renderer.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ComputeError;
use crate::types::FrameState;
use crate::{MUDRA_VERSION, PRODUCER_NAME};

/// Current output schema version
pub const STATE_SCHEMA_VERSION: &str = "mudra.state.v1";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Complete per-frame payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePayload {
    pub schema_version: String,
    pub producer: StateProducer,
    /// Identifier of the source frame, if the capture side assigned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    pub computed_at_utc: String,
    pub state: FrameState,
}

/// Encoder for producing frame payloads
pub struct FrameEncoder {
    instance_id: String,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap frame state into a payload
    pub fn encode(&self, state: &FrameState, frame_id: Option<&str>) -> FramePayload {
        FramePayload {
            schema_version: STATE_SCHEMA_VERSION.to_string(),
            producer: StateProducer {
                name: PRODUCER_NAME.to_string(),
                version: MUDRA_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            frame_id: frame_id.map(str::to_string),
            computed_at_utc: Utc::now().to_rfc3339(),
            state: state.clone(),
        }
    }

    /// Encode to a single-line JSON string
    pub fn encode_to_json(
        &self,
        state: &FrameState,
        frame_id: Option<&str>,
    ) -> Result<String, ComputeError> {
        let payload = self.encode(state, frame_id);
        serde_json::to_string(&payload).map_err(ComputeError::JsonError)
    }
}

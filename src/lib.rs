//! Synheart Mudra - On-device engine for gesture-guided meditation feedback
//!
//! Mudra turns per-frame body landmarks into the state a meditation renderer
//! draws, through a deterministic pipeline: frame adaptation → feature
//! extraction → posture and gesture classification → alignment tracking →
//! zone energy dynamics → animation clock → state encoding.
//!
//! ## Modules
//!
//! - **Session Pipeline**: Process `mudra.frame.v1` landmark frames into `mudra.state.v1` payloads
//! - **Catalogue**: Display text and colors for zones and mudras

pub mod alignment;
pub mod catalogue;
pub mod clock;
pub mod config;
pub mod encoder;
pub mod energy;
pub mod error;
pub mod features;
pub mod gesture;
pub mod pipeline;
pub mod posture;
pub mod schema;
pub mod summary;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use catalogue::Catalogue;
pub use config::SessionConfig;
pub use error::ComputeError;
pub use pipeline::{frames_to_states, MudraSession, SessionState};
pub use summary::SessionReport;
pub use types::{FrameInput, FrameState};

// Schema exports
pub use schema::{FrameAdapter, FrameRecord, SCHEMA_VERSION};

/// Mudra version embedded in all state payloads
pub const MUDRA_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for state payloads
pub const PRODUCER_NAME: &str = "synheart-mudra";

//! Zone energy dynamics
//!
//! Each frame exactly one regime updates the energy vector, selected in
//! priority order: alignment raise, gesture focus, idle decay.

use tracing::trace;

use crate::config::EnergyConfig;
use crate::types::{AlignmentReading, EnergyVector, GestureResult, Zone};

/// Lower bound every zone stays above
pub const ENERGY_MIN: f64 = 0.05;
/// Upper bound every zone stays below
pub const ENERGY_MAX: f64 = 1.0;

/// The update applied to the energy vector for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyRegime {
    /// Raise every zone to at least `target`
    Raise { target: f64 },
    /// Grow the bound zone, gently decay the rest
    Focus { zone: Zone },
    /// Decay every zone
    Idle,
}

impl EnergyRegime {
    /// Pick the regime for a frame (first match wins)
    pub fn select(gesture: &GestureResult, alignment: &AlignmentReading) -> Self {
        match (alignment.is_aligning(), gesture.zone) {
            (true, _) => EnergyRegime::Raise {
                target: alignment.progress,
            },
            (false, Some(zone)) => EnergyRegime::Focus { zone },
            (false, None) => EnergyRegime::Idle,
        }
    }
}

/// Applies energy regimes to an `EnergyVector`
#[derive(Debug, Clone, Default)]
pub struct EnergyEngine {
    config: EnergyConfig,
}

impl EnergyEngine {
    pub fn new(config: EnergyConfig) -> Self {
        Self { config }
    }

    /// Update the vector for one frame and return the regime used
    pub fn update(
        &self,
        energy: &mut EnergyVector,
        gesture: &GestureResult,
        alignment: &AlignmentReading,
    ) -> EnergyRegime {
        let regime = EnergyRegime::select(gesture, alignment);
        self.apply(energy, regime);
        trace!(?regime, "energy updated");
        regime
    }

    pub fn apply(&self, energy: &mut EnergyVector, regime: EnergyRegime) {
        let cfg = &self.config;
        let values = energy.values_mut();

        match regime {
            EnergyRegime::Raise { target } => {
                for value in values.iter_mut() {
                    *value = value.max(target);
                }
            }
            EnergyRegime::Focus { zone } => {
                for (i, value) in values.iter_mut().enumerate() {
                    *value = if i == zone.index() {
                        (*value + cfg.focus_growth).min(ENERGY_MAX)
                    } else {
                        (*value - cfg.focus_decay).max(cfg.focus_floor)
                    };
                }
            }
            EnergyRegime::Idle => {
                for value in values.iter_mut() {
                    *value = (*value - cfg.idle_decay).max(cfg.idle_floor);
                }
            }
        }

        for value in values.iter_mut() {
            *value = value.clamp(ENERGY_MIN, ENERGY_MAX);
        }
    }
}

//! Gesture classification
//!
//! Recognizes hand mudras from the hand observations of a single frame.
//! Classification is an ordered rule table evaluated first-match-wins:
//! two-hand prayer, then single-hand wisdom, then (when enabled) the rest of
//! the catalogue.

use tracing::trace;

use crate::config::GestureConfig;
use crate::features::FeatureExtractor;
use crate::types::{GestureResult, HandObservation, Landmark, Mudra};

pub const WRIST: usize = 0;
pub const THUMB_MCP: usize = 2;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

/// A classification rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureRule {
    /// Two wrists held together (Anjali)
    Prayer,
    /// Thumb tip touching index tip on either hand (Gyan)
    Wisdom,
    /// Remaining catalogue mudras, only when enabled
    Extended,
}

impl GestureRule {
    /// Rules in evaluation order
    pub const PRIORITY: [GestureRule; 3] =
        [GestureRule::Prayer, GestureRule::Wisdom, GestureRule::Extended];

    fn evaluate(&self, config: &GestureConfig, hands: &[HandObservation]) -> Option<GestureResult> {
        match self {
            GestureRule::Prayer => prayer(config, hands),
            GestureRule::Wisdom => wisdom(config, hands),
            GestureRule::Extended if config.extended_catalogue => extended(config, hands),
            GestureRule::Extended => None,
        }
    }
}

/// Stateless mudra classifier
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    config: GestureConfig,
}

impl GestureClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self { config }
    }

    /// Classify the hands of one frame
    pub fn classify(&self, hands: &[HandObservation]) -> GestureResult {
        for rule in GestureRule::PRIORITY {
            if let Some(result) = rule.evaluate(&self.config, hands) {
                trace!(?rule, mudra = ?result.mudra, "gesture matched");
                return result;
            }
        }
        GestureResult::none()
    }

    /// Whether the classifier can ever report this mudra
    pub fn can_detect(&self, mudra: Mudra) -> bool {
        match mudra {
            Mudra::Anjali | Mudra::Gyan => true,
            _ => self.config.extended_catalogue,
        }
    }
}

fn detected(mudra: Mudra) -> GestureResult {
    GestureResult {
        mudra: Some(mudra),
        zone: Some(mudra.zone()),
        is_primary_focus: mudra == Mudra::Gyan,
    }
}

fn prayer(config: &GestureConfig, hands: &[HandObservation]) -> Option<GestureResult> {
    let [first, second] = hands else {
        return None;
    };
    let distance = FeatureExtractor::distance(first.landmark(WRIST)?, second.landmark(WRIST)?);
    (distance < config.prayer_wrist_distance).then(|| detected(Mudra::Anjali))
}

fn wisdom(config: &GestureConfig, hands: &[HandObservation]) -> Option<GestureResult> {
    hands
        .iter()
        .find(|hand| tips_within(hand, THUMB_TIP, &[INDEX_TIP], config.wisdom_pinch_distance))
        .map(|_| detected(Mudra::Gyan))
}

/// Extended mudras checked per hand; larger clusters come first so a
/// three-finger mudra is not reported as its two-finger subset.
const EXTENDED: [(Mudra, usize, &[usize]); 4] = [
    (Mudra::Prana, THUMB_TIP, &[RING_TIP, PINKY_TIP]),
    (Mudra::Apana, THUMB_TIP, &[MIDDLE_TIP, RING_TIP]),
    (Mudra::Varun, THUMB_TIP, &[PINKY_TIP]),
    (Mudra::Surya, THUMB_MCP, &[RING_TIP]),
];

fn extended(config: &GestureConfig, hands: &[HandObservation]) -> Option<GestureResult> {
    hands.iter().find_map(|hand| {
        EXTENDED
            .iter()
            .find(|(_, anchor, tips)| tips_within(hand, *anchor, tips, config.cluster_distance))
            .map(|(mudra, _, _)| detected(*mudra))
    })
}

/// True when every tip lies within `threshold` of the anchor landmark
fn tips_within(hand: &HandObservation, anchor: usize, tips: &[usize], threshold: f64) -> bool {
    let Some(anchor) = hand.landmark(anchor) else {
        return false;
    };
    tips.iter().all(|&tip| {
        hand.landmark(tip)
            .map(|tip: &Landmark| FeatureExtractor::distance(anchor, tip) < threshold)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Zone, HAND_LANDMARK_COUNT};

    /// An open hand with the wrist at (x, y) and fingertips spread well apart
    fn open_hand(x: f64, y: f64) -> HandObservation {
        let mut landmarks = vec![Landmark::new(x, y); HAND_LANDMARK_COUNT];
        landmarks[THUMB_MCP] = Landmark::new(x - 0.05, y - 0.04);
        landmarks[THUMB_TIP] = Landmark::new(x - 0.10, y - 0.10);
        landmarks[INDEX_TIP] = Landmark::new(x - 0.04, y - 0.25);
        landmarks[MIDDLE_TIP] = Landmark::new(x, y - 0.28);
        landmarks[RING_TIP] = Landmark::new(x + 0.04, y - 0.25);
        landmarks[PINKY_TIP] = Landmark::new(x + 0.08, y - 0.20);
        HandObservation::new(landmarks)
    }

    fn touching(mut hand: HandObservation, anchor: usize, tips: &[usize]) -> HandObservation {
        let at = hand.landmarks[anchor];
        for &tip in tips {
            hand.landmarks[tip] = Landmark::new(at.x + 0.01, at.y);
        }
        hand
    }

    #[test]
    fn test_no_hands() {
        let classifier = GestureClassifier::default();
        assert_eq!(classifier.classify(&[]), GestureResult::none());
    }

    #[test]
    fn test_prayer_wrists_close() {
        let classifier = GestureClassifier::default();
        let hands = vec![open_hand(0.45, 0.6), open_hand(0.55, 0.6)];
        let result = classifier.classify(&hands);

        assert_eq!(result.mudra, Some(Mudra::Anjali));
        assert_eq!(result.zone, Some(Zone::Throat));
        assert_eq!(result.zone.map(|z| z.index()), Some(4));
        assert!(!result.is_primary_focus);
    }

    #[test]
    fn test_wrists_apart_without_pinch() {
        let classifier = GestureClassifier::default();
        let hands = vec![open_hand(0.25, 0.6), open_hand(0.75, 0.6)];
        assert_eq!(classifier.classify(&hands), GestureResult::none());
    }

    #[test]
    fn test_wisdom_single_hand() {
        let classifier = GestureClassifier::default();
        let hands = vec![touching(open_hand(0.5, 0.6), THUMB_TIP, &[INDEX_TIP])];
        let result = classifier.classify(&hands);

        assert_eq!(result.mudra, Some(Mudra::Gyan));
        assert_eq!(result.zone, Some(Zone::Crown));
        assert!(result.is_primary_focus);
    }

    #[test]
    fn test_wisdom_on_second_hand() {
        let classifier = GestureClassifier::default();
        let hands = vec![
            open_hand(0.2, 0.6),
            touching(open_hand(0.8, 0.6), THUMB_TIP, &[INDEX_TIP]),
        ];
        assert_eq!(classifier.classify(&hands).mudra, Some(Mudra::Gyan));
    }

    #[test]
    fn test_prayer_takes_priority_over_wisdom() {
        let classifier = GestureClassifier::default();
        let hands = vec![
            touching(open_hand(0.45, 0.6), THUMB_TIP, &[INDEX_TIP]),
            open_hand(0.55, 0.6),
        ];
        assert_eq!(classifier.classify(&hands).mudra, Some(Mudra::Anjali));
    }

    #[test]
    fn test_prayer_needs_exactly_two_hands() {
        let classifier = GestureClassifier::default();
        let hands = vec![open_hand(0.5, 0.6), open_hand(0.52, 0.6), open_hand(0.54, 0.6)];
        assert_eq!(classifier.classify(&hands), GestureResult::none());
    }

    #[test]
    fn test_truncated_hand_never_matches() {
        let classifier = GestureClassifier::default();
        let mut hand = touching(open_hand(0.5, 0.6), THUMB_TIP, &[INDEX_TIP]);
        hand.landmarks.truncate(6);
        assert_eq!(classifier.classify(&[hand]), GestureResult::none());
    }

    #[test]
    fn test_extended_disabled_by_default() {
        let classifier = GestureClassifier::default();
        let hands = vec![touching(open_hand(0.5, 0.6), THUMB_TIP, &[RING_TIP, PINKY_TIP])];
        assert_eq!(classifier.classify(&hands), GestureResult::none());
        assert!(!classifier.can_detect(Mudra::Prana));
        assert!(classifier.can_detect(Mudra::Gyan));
    }

    #[test]
    fn test_extended_catalogue() {
        let classifier = GestureClassifier::new(GestureConfig {
            extended_catalogue: true,
            ..Default::default()
        });

        let cases = [
            (
                touching(open_hand(0.5, 0.6), THUMB_TIP, &[RING_TIP, PINKY_TIP]),
                Mudra::Prana,
                Zone::Root,
            ),
            (
                touching(open_hand(0.5, 0.6), THUMB_TIP, &[MIDDLE_TIP, RING_TIP]),
                Mudra::Apana,
                Zone::Sacral,
            ),
            (
                touching(open_hand(0.5, 0.6), THUMB_TIP, &[PINKY_TIP]),
                Mudra::Varun,
                Zone::Sacral,
            ),
            (
                touching(open_hand(0.5, 0.6), THUMB_MCP, &[RING_TIP]),
                Mudra::Surya,
                Zone::SolarPlexus,
            ),
        ];

        for (hand, mudra, zone) in cases {
            let result = classifier.classify(&[hand]);
            assert_eq!(result.mudra, Some(mudra));
            assert_eq!(result.zone, Some(zone));
            assert!(!result.is_primary_focus);
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = GestureClassifier::default();
        let hands = vec![touching(open_hand(0.5, 0.6), THUMB_TIP, &[INDEX_TIP])];
        assert_eq!(classifier.classify(&hands), classifier.classify(&hands));
    }
}

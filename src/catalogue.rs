//! Display catalogue
//!
//! Names, colors and guide text the renderer shows for zones and mudras.
//! The catalogue lists every mudra; which ones can actually be reported
//! depends on the classifier configuration.

use serde::Serialize;

use crate::gesture::GestureClassifier;
use crate::types::{Mudra, Zone};

/// Display data for one zone
#[derive(Debug, Clone, Serialize)]
pub struct ZoneInfo {
    pub zone: Zone,
    pub name: &'static str,
    /// BGR color
    pub color: [u8; 3],
}

/// Display data for one mudra
#[derive(Debug, Clone, Serialize)]
pub struct MudraInfo {
    pub mudra: Mudra,
    pub name: &'static str,
    /// Short sidebar caption
    pub caption: &'static str,
    /// Info panel heading
    pub title: &'static str,
    pub benefits: [&'static str; 3],
    pub zone: Zone,
    /// Whether the current classifier can report it
    pub detectable: bool,
}

/// Heading of the info panel when no mudra is active
pub const GUIDE_TITLE: &str = "CHAKRA AI FLOW";

/// Guide lines shown when no mudra is active; `**` marks emphasis
pub const GUIDE_LINES: [&str; 4] = [
    "Sit in **Lotus Pose**",
    "Show **Hand Mudras**",
    "Close **Eyes**",
    "Focus on **Breath**",
];

pub fn zone_name(zone: Zone) -> &'static str {
    match zone {
        Zone::Root => "Root",
        Zone::Sacral => "Sacral",
        Zone::SolarPlexus => "Solar Plexus",
        Zone::Heart => "Heart",
        Zone::Throat => "Throat",
        Zone::ThirdEye => "Third Eye",
        Zone::Crown => "Crown",
    }
}

pub fn zone_color(zone: Zone) -> [u8; 3] {
    match zone {
        Zone::Root => [0, 0, 255],
        Zone::Sacral => [0, 140, 255],
        Zone::SolarPlexus => [0, 255, 255],
        Zone::Heart => [0, 255, 0],
        Zone::Throat => [255, 0, 0],
        Zone::ThirdEye => [255, 0, 255],
        Zone::Crown => [255, 255, 255],
    }
}

pub fn zone_info(zone: Zone) -> ZoneInfo {
    ZoneInfo {
        zone,
        name: zone_name(zone),
        color: zone_color(zone),
    }
}

/// Static display text for a mudra: (name, caption, title, benefits)
fn mudra_text(mudra: Mudra) -> (&'static str, &'static str, &'static str, [&'static str; 3]) {
    match mudra {
        Mudra::Gyan => (
            "Gyan",
            "Wisdom",
            "GYAN MUDRA (Wisdom)",
            ["Improves concentration", "Sharpens memory", "Reduces stress"],
        ),
        Mudra::Prana => (
            "Prana",
            "Vitality",
            "PRANA MUDRA (Vitality)",
            ["Boosts energy", "Improves vision", "Activates root chakra"],
        ),
        Mudra::Apana => (
            "Apana",
            "Detox",
            "APANA MUDRA (Detox)",
            ["Detoxifies body", "Improves digestion", "Inner balance"],
        ),
        Mudra::Surya => (
            "Surya",
            "Fire/Wt",
            "SURYA MUDRA (Fire)",
            ["Boosts metabolism", "Generates heat", "Weight loss aid"],
        ),
        Mudra::Varun => (
            "Varun",
            "Water",
            "VARUN MUDRA (Water)",
            ["Hydrates skin", "Balances fluids", "Improves circulation"],
        ),
        Mudra::Anjali => (
            "Anjali",
            "Prayer",
            "ANJALI MUDRA (Prayer)",
            ["Inner peace", "Brain balance", "Gratitude"],
        ),
    }
}

pub fn mudra_info(mudra: Mudra, classifier: &GestureClassifier) -> MudraInfo {
    let (name, caption, title, benefits) = mudra_text(mudra);
    MudraInfo {
        mudra,
        name,
        caption,
        title,
        benefits,
        zone: mudra.zone(),
        detectable: classifier.can_detect(mudra),
    }
}

/// Full catalogue as served to renderers
#[derive(Debug, Clone, Serialize)]
pub struct Catalogue {
    pub zones: Vec<ZoneInfo>,
    pub mudras: Vec<MudraInfo>,
    pub guide_title: &'static str,
    pub guide_lines: [&'static str; 4],
}

impl Catalogue {
    pub fn new(classifier: &GestureClassifier) -> Self {
        Self {
            zones: Zone::ALL.into_iter().map(zone_info).collect(),
            mudras: Mudra::ALL
                .into_iter()
                .map(|m| mudra_info(m, classifier))
                .collect(),
            guide_title: GUIDE_TITLE,
            guide_lines: GUIDE_LINES,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GestureConfig;

    #[test]
    fn test_catalogue_lists_everything() {
        let catalogue = Catalogue::new(&GestureClassifier::default());
        assert_eq!(catalogue.zones.len(), 7);
        assert_eq!(catalogue.mudras.len(), 6);
        assert_eq!(catalogue.zones[2].name, "Solar Plexus");
    }

    #[test]
    fn test_detectable_follows_classifier() {
        let default = Catalogue::new(&GestureClassifier::default());
        let detectable: Vec<Mudra> = default
            .mudras
            .iter()
            .filter(|m| m.detectable)
            .map(|m| m.mudra)
            .collect();
        assert_eq!(detectable, vec![Mudra::Gyan, Mudra::Anjali]);

        let extended = Catalogue::new(&GestureClassifier::new(GestureConfig {
            extended_catalogue: true,
            ..Default::default()
        }));
        assert!(extended.mudras.iter().all(|m| m.detectable));
    }

    #[test]
    fn test_extended_captions_and_zones() {
        let catalogue = Catalogue::new(&GestureClassifier::default());
        let info = |mudra: Mudra| {
            catalogue
                .mudras
                .iter()
                .find(|m| m.mudra == mudra)
                .unwrap()
                .clone()
        };

        let surya = info(Mudra::Surya);
        assert_eq!(surya.caption, "Fire/Wt");
        assert_eq!(surya.title, "SURYA MUDRA (Fire)");
        assert_eq!(surya.zone, Zone::SolarPlexus);

        assert_eq!(info(Mudra::Prana).zone, Zone::Root);
        assert_eq!(info(Mudra::Apana).zone, Zone::Sacral);
        assert_eq!(info(Mudra::Varun).zone, Zone::Sacral);
    }

    #[test]
    fn test_catalogue_json() {
        let json = Catalogue::new(&GestureClassifier::default()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["mudras"][0]["title"], "GYAN MUDRA (Wisdom)");
        assert_eq!(value["mudras"][5]["zone"], "throat");
        assert_eq!(value["guide_title"], "CHAKRA AI FLOW");
    }
}

//! Project achievements attached to early and lucky records.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One project entry. The two carbon estimates are mutually exclusive in
/// the template; whichever is absent is omitted from the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub project_name: String,
    pub description: String,
    pub current_status: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_sequestered_estimate_tonnes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_saved_estimate_tonnes: Option<u32>,
    pub deforestation_prevented_km2: u32,
}

/// The fixed achievements template, in output order.
pub fn template() -> Vec<Achievement> {
    vec![
        Achievement {
            project_name: "Legado Early - Guania Colombia".into(),
            description: "Before going sale, Legado has helped communities in the Guania region \
                          of Colombia to protect 20,000 hectares of rainforest, preventing \
                          deforestation and conserving biodiversity."
                .into(),
            current_status: "Up to 8 communities are now involved in the project, with 100% of \
                             the land protected from deforestation."
                .into(),
            region: "Amazon Rainforest, Colombia".into(),
            co2_sequestered_estimate_tonnes: Some(4),
            co2_saved_estimate_tonnes: None,
            deforestation_prevented_km2: 5,
        },
        Achievement {
            project_name: "Legado Early - Africa".into(),
            description: "Legado Africa is a project that aims to give access to clean water \
                          to 1 million people in Africa by 2030."
                .into(),
            current_status: "The project has already provided clean water to 100,000 people \
                             in 2024."
                .into(),
            region: "Africa".into(),
            co2_sequestered_estimate_tonnes: None,
            co2_saved_estimate_tonnes: Some(1),
            deforestation_prevented_km2: 1,
        },
    ]
}

/// Which serial numbers carry the template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementPolicy {
    /// Serials `1..=guaranteed_through` always carry it.
    pub guaranteed_through: u64,
    /// Chance for any later serial.
    pub probability: f64,
}

impl Default for AchievementPolicy {
    fn default() -> Self {
        Self { guaranteed_through: 50, probability: 0.01 }
    }
}

impl AchievementPolicy {
    /// Guaranteed serials never consume a draw.
    pub fn includes<R: Rng + ?Sized>(&self, serial: u64, rng: &mut R) -> bool {
        serial <= self.guaranteed_through || rng.gen_bool(self.probability)
    }
}

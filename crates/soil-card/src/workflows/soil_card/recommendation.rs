//! Soil amendment and fertilizer advice derived from a record's readings.
//!
//! Rules run in a fixed order and append to their bucket, so the output order
//! is stable for identical input. Nothing here can fail: missing readings
//! simply leave their rule silent.

use super::catalog::Nutrient;
use super::domain::NutrientValues;
use serde::Serialize;

const LIME: &str = "Lime application @ 2-4 t/ha";
const GYPSUM: &str = "Gypsum application @ 2-3 t/ha";
const COMPOST: &str = "FYM/Compost @ 10-12 t/ha";

const ACIDIC_PH_BELOW: f64 = 5.5;
const ALKALINE_PH_ABOVE: f64 = 8.5;
const ORGANIC_CARBON_BELOW: f64 = 0.5;

const MICRONUTRIENT_DOSES: [(Nutrient, &str); 3] = [
    (Nutrient::Zinc, "Zinc Sulphate @ 25 kg/ha"),
    (Nutrient::Boron, "Borax @ 10 kg/ha"),
    (Nutrient::Iron, "FeSO4 @ 25 kg/ha"),
];

/// Crops with their own macro-nutrient dosage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Crop {
    Rice,
    Wheat,
    Maize,
}

impl Crop {
    /// Case-insensitive match on the selected crop. Anything unrecognised,
    /// including no selection, falls back to rice.
    pub fn from_selection(selected: Option<&str>) -> Self {
        match selected.map(|crop| crop.trim().to_ascii_lowercase()).as_deref() {
            Some("wheat") => Self::Wheat,
            Some("maize") => Self::Maize,
            _ => Self::Rice,
        }
    }

    pub const fn dosage(self) -> CropDosage {
        match self {
            Self::Rice => CropDosage {
                nitrogen: "Urea @ 130 kg/ha",
                phosphorus: "SSP @ 250 kg/ha",
                potassium: "MOP @ 100 kg/ha",
            },
            Self::Wheat => CropDosage {
                nitrogen: "Urea @ 120 kg/ha",
                phosphorus: "DAP @ 120 kg/ha",
                potassium: "MOP @ 80 kg/ha",
            },
            Self::Maize => CropDosage {
                nitrogen: "Urea @ 140 kg/ha",
                phosphorus: "SSP @ 300 kg/ha",
                potassium: "MOP @ 120 kg/ha",
            },
        }
    }
}

/// Fixed N/P/K doses for one crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropDosage {
    pub nitrogen: &'static str,
    pub phosphorus: &'static str,
    pub potassium: &'static str,
}

impl CropDosage {
    fn for_nutrient(&self, nutrient: Nutrient) -> Option<&'static str> {
        match nutrient {
            Nutrient::Nitrogen => Some(self.nitrogen),
            Nutrient::Phosphorus => Some(self.phosphorus),
            Nutrient::Potassium => Some(self.potassium),
            _ => None,
        }
    }
}

/// Two-way supply check used only for recommendations. Unlike the displayed
/// status it has no medium/high split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyLevel {
    Low,
    Sufficient,
    Unknown,
}

pub fn supply_level(nutrient: Nutrient, value: Option<f64>) -> SupplyLevel {
    match value {
        Some(value) if value.is_finite() => {
            if below_recommendation_threshold(nutrient, value) {
                SupplyLevel::Low
            } else {
                SupplyLevel::Sufficient
            }
        }
        _ => SupplyLevel::Unknown,
    }
}

pub fn below_recommendation_threshold(nutrient: Nutrient, value: f64) -> bool {
    value < nutrient.spec().low
}

/// Ordered advice buckets printed in the recommendations table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecommendationSet {
    pub soil_amendment: Vec<&'static str>,
    pub fertilizer_combo_1: Vec<&'static str>,
    pub fertilizer_combo_2: Vec<&'static str>,
}

impl RecommendationSet {
    pub fn is_empty(&self) -> bool {
        self.soil_amendment.is_empty()
            && self.fertilizer_combo_1.is_empty()
            && self.fertilizer_combo_2.is_empty()
    }

    pub fn buckets(&self) -> [&[&'static str]; 3] {
        [
            self.soil_amendment.as_slice(),
            self.fertilizer_combo_1.as_slice(),
            self.fertilizer_combo_2.as_slice(),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn recommend(&self, nutrients: &NutrientValues, crop: Option<&str>) -> RecommendationSet {
        let mut set = RecommendationSet::default();

        if let Some(ph) = nutrients.get(Nutrient::Ph) {
            if ph < ACIDIC_PH_BELOW {
                set.soil_amendment.push(LIME);
            } else if ph > ALKALINE_PH_ABOVE {
                set.soil_amendment.push(GYPSUM);
            }
        }

        if let Some(carbon) = nutrients.get(Nutrient::OrganicCarbon) {
            if carbon < ORGANIC_CARBON_BELOW {
                set.soil_amendment.push(COMPOST);
            }
        }

        let dosage = Crop::from_selection(crop).dosage();
        for nutrient in [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium] {
            if supply_level(nutrient, nutrients.get(nutrient)) == SupplyLevel::Low {
                if let Some(dose) = dosage.for_nutrient(nutrient) {
                    set.fertilizer_combo_1.push(dose);
                }
            }
        }

        for (nutrient, dose) in MICRONUTRIENT_DOSES {
            if supply_level(nutrient, nutrients.get(nutrient)) == SupplyLevel::Low {
                set.fertilizer_combo_2.push(dose);
            }
        }

        set
    }
}

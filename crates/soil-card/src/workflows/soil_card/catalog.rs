use serde::{Deserialize, Serialize};
use std::fmt;

/// Soil parameters measured on a card. Declaration order is the canonical
/// display order of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
    Ph,
    ElectricalConductivity,
    OrganicCarbon,
    Sulphur,
    Zinc,
    Boron,
    Iron,
    Manganese,
    Copper,
}

impl Nutrient {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::Nitrogen,
            Self::Phosphorus,
            Self::Potassium,
            Self::Ph,
            Self::ElectricalConductivity,
            Self::OrganicCarbon,
            Self::Sulphur,
            Self::Zinc,
            Self::Boron,
            Self::Iron,
            Self::Manganese,
            Self::Copper,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Nitrogen => "nitrogen",
            Self::Phosphorus => "phosphorus",
            Self::Potassium => "potassium",
            Self::Ph => "ph",
            Self::ElectricalConductivity => "electrical_conductivity",
            Self::OrganicCarbon => "organic_carbon",
            Self::Sulphur => "sulphur",
            Self::Zinc => "zinc",
            Self::Boron => "boron",
            Self::Iron => "iron",
            Self::Manganese => "manganese",
            Self::Copper => "copper",
        }
    }

    /// Case-insensitive lookup of a catalog key such as `organic_carbon`.
    pub fn from_key(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|nutrient| nutrient.key().eq_ignore_ascii_case(wanted))
    }

    /// Display label: the key with separators turned into spaces, title-cased.
    pub fn label(self) -> String {
        self.key()
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn spec(self) -> &'static NutrientSpec {
        // CATALOG is declared in `ordered()` order.
        &CATALOG[self as usize]
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Reference thresholds for one nutrient. Values below `low` are deficient,
/// values up to and including `medium` are medium, anything above is high.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientSpec {
    pub nutrient: Nutrient,
    pub low: f64,
    pub medium: f64,
    pub unit: &'static str,
}

impl NutrientSpec {
    pub fn key(&self) -> &'static str {
        self.nutrient.key()
    }

    /// `<low | low-medium | >medium`, e.g. `<280 | 280-560 | >560`.
    pub fn range_text(&self) -> String {
        format!(
            "<{low} | {low}-{medium} | >{medium}",
            low = self.low,
            medium = self.medium
        )
    }

    /// Value with its unit appended, or the bare value for unit-less readings.
    pub fn display_value(&self, value: f64) -> String {
        if self.unit.is_empty() {
            value.to_string()
        } else {
            format!("{value} {}", self.unit)
        }
    }
}

const CATALOG: [NutrientSpec; 12] = [
    NutrientSpec {
        nutrient: Nutrient::Nitrogen,
        low: 280.0,
        medium: 560.0,
        unit: "kg/ha",
    },
    NutrientSpec {
        nutrient: Nutrient::Phosphorus,
        low: 10.0,
        medium: 25.0,
        unit: "kg/ha",
    },
    NutrientSpec {
        nutrient: Nutrient::Potassium,
        low: 120.0,
        medium: 280.0,
        unit: "kg/ha",
    },
    NutrientSpec {
        nutrient: Nutrient::Ph,
        low: 5.5,
        medium: 8.5,
        unit: "",
    },
    NutrientSpec {
        nutrient: Nutrient::ElectricalConductivity,
        low: 1.0,
        medium: 4.0,
        unit: "dS/m",
    },
    NutrientSpec {
        nutrient: Nutrient::OrganicCarbon,
        low: 0.50,
        medium: 0.75,
        unit: "%",
    },
    NutrientSpec {
        nutrient: Nutrient::Sulphur,
        low: 10.0,
        medium: 20.0,
        unit: "mg/kg",
    },
    NutrientSpec {
        nutrient: Nutrient::Zinc,
        low: 0.6,
        medium: 1.2,
        unit: "mg/kg",
    },
    NutrientSpec {
        nutrient: Nutrient::Boron,
        low: 0.5,
        medium: 1.0,
        unit: "mg/kg",
    },
    NutrientSpec {
        nutrient: Nutrient::Iron,
        low: 4.5,
        medium: 9.0,
        unit: "mg/kg",
    },
    NutrientSpec {
        nutrient: Nutrient::Manganese,
        low: 2.0,
        medium: 4.0,
        unit: "mg/kg",
    },
    NutrientSpec {
        nutrient: Nutrient::Copper,
        low: 0.2,
        medium: 0.4,
        unit: "mg/kg",
    },
];

/// Read-only view over the built-in nutrient reference table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NutrientCatalog;

impl NutrientCatalog {
    pub fn standard() -> Self {
        Self
    }

    pub fn specs(&self) -> &'static [NutrientSpec] {
        &CATALOG
    }

    pub fn lookup(&self, key: &str) -> Option<&'static NutrientSpec> {
        Nutrient::from_key(key).map(Nutrient::spec)
    }
}

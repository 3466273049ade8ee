use super::catalog::{Nutrient, NutrientSpec};
use serde::Serialize;

/// Three-way fertility status shown on the card, plus the sentinel for
/// readings that were not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientStatus {
    NotAvailable,
    Low,
    Medium,
    High,
}

impl NutrientStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotAvailable => "NOT AVAILABLE",
            Self::Low => "LOW, DEFICIENT",
            Self::Medium => "MEDIUM, NEUTRAL",
            Self::High => "HIGH, SUFFICIENT",
        }
    }

    pub const fn tone(self) -> StatusTone {
        match self {
            Self::NotAvailable => StatusTone::Grey,
            Self::Low => StatusTone::Red,
            Self::Medium => StatusTone::Amber,
            Self::High => StatusTone::Green,
        }
    }
}

/// Colour tag attached to a classified row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Red,
    Amber,
    Green,
    Grey,
}

impl StatusTone {
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Red => (255, 0, 0),
            Self::Amber => (255, 165, 0),
            Self::Green => (0, 128, 0),
            Self::Grey => (128, 128, 128),
        }
    }
}

/// A classified measurement. Derived per report, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientReading {
    pub nutrient: Nutrient,
    pub value: Option<f64>,
    pub status: NutrientStatus,
}

/// Classifies a typed reading. Absent or non-finite values are not available.
pub fn classify(nutrient: Nutrient, value: Option<f64>) -> NutrientStatus {
    match value {
        Some(value) if value.is_finite() => classify_against(nutrient.spec(), value),
        _ => NutrientStatus::NotAvailable,
    }
}

/// Classifies untrusted text input. Unknown keys, blank and unparsable values
/// all map to [`NutrientStatus::NotAvailable`].
pub fn classify_raw(key: &str, value: Option<&str>) -> NutrientStatus {
    let Some(nutrient) = Nutrient::from_key(key) else {
        return NutrientStatus::NotAvailable;
    };
    let parsed = value.and_then(|raw| raw.trim().parse::<f64>().ok());
    classify(nutrient, parsed)
}

// `medium` is inclusive: a value equal to it is still medium.
fn classify_against(spec: &NutrientSpec, value: f64) -> NutrientStatus {
    if value < spec.low {
        NutrientStatus::Low
    } else if value <= spec.medium {
        NutrientStatus::Medium
    } else {
        NutrientStatus::High
    }
}

pub fn read(nutrient: Nutrient, value: Option<f64>) -> NutrientReading {
    NutrientReading {
        nutrient,
        value,
        status: classify(nutrient, value),
    }
}

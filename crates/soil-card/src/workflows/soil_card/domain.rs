use super::catalog::Nutrient;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Descriptive fields printed in the card header. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardMetadata {
    pub farmer_name: Option<String>,
    pub center_name: Option<String>,
    pub address: Option<String>,
    pub test_id: Option<String>,
    pub testing_date: Option<String>,
    pub survey_no: Option<String>,
    pub farmer_address: Option<String>,
    pub selected_crop: Option<String>,
}

/// Recognised metadata columns, matched case-insensitively on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    FarmerName,
    CenterName,
    Address,
    TestId,
    TestingDate,
    SurveyNo,
    FarmerAddress,
    SelectedCrop,
}

impl MetadataField {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::FarmerName,
            Self::CenterName,
            Self::Address,
            Self::TestId,
            Self::TestingDate,
            Self::SurveyNo,
            Self::FarmerAddress,
            Self::SelectedCrop,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::FarmerName => "farmer_name",
            Self::CenterName => "center_name",
            Self::Address => "address",
            Self::TestId => "test_id",
            Self::TestingDate => "testing_date",
            Self::SurveyNo => "survey_no",
            Self::FarmerAddress => "farmer_address",
            Self::SelectedCrop => "selected_crop",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(wanted))
    }
}

impl CardMetadata {
    pub fn get(&self, field: MetadataField) -> Option<&str> {
        let slot = match field {
            MetadataField::FarmerName => &self.farmer_name,
            MetadataField::CenterName => &self.center_name,
            MetadataField::Address => &self.address,
            MetadataField::TestId => &self.test_id,
            MetadataField::TestingDate => &self.testing_date,
            MetadataField::SurveyNo => &self.survey_no,
            MetadataField::FarmerAddress => &self.farmer_address,
            MetadataField::SelectedCrop => &self.selected_crop,
        };
        slot.as_deref()
    }

    /// Stores a trimmed value; blank input clears the field.
    pub fn set(&mut self, field: MetadataField, value: &str) {
        let slot = match field {
            MetadataField::FarmerName => &mut self.farmer_name,
            MetadataField::CenterName => &mut self.center_name,
            MetadataField::Address => &mut self.address,
            MetadataField::TestId => &mut self.test_id,
            MetadataField::TestingDate => &mut self.testing_date,
            MetadataField::SurveyNo => &mut self.survey_no,
            MetadataField::FarmerAddress => &mut self.farmer_address,
            MetadataField::SelectedCrop => &mut self.selected_crop,
        };
        *slot = non_blank(value);
    }
}

/// Measured values keyed by nutrient. A missing entry means "not available",
/// never zero.
///
/// Deserialization is lenient: keys match catalog keys case-insensitively,
/// unknown keys are dropped, and numeric strings are accepted. Anything else
/// reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NutrientValues(BTreeMap<Nutrient, Option<f64>>);

impl<'de> Deserialize<'de> for NutrientValues {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut values = Self::new();
        for (key, value) in &raw {
            let Some(nutrient) = Nutrient::from_key(key) else {
                continue;
            };
            // Absent duplicates (`Nitrogen` and `nitrogen`) never clear a reading.
            if let Some(reading) = json_measurement(value) {
                values.set(nutrient, Some(reading));
            }
        }
        Ok(values)
    }
}

fn json_measurement(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl NutrientValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        self.0
            .get(&nutrient)
            .copied()
            .flatten()
            .filter(|value| value.is_finite())
    }

    pub fn set(&mut self, nutrient: Nutrient, value: Option<f64>) {
        match value.filter(|value| value.is_finite()) {
            Some(value) => {
                self.0.insert(nutrient, Some(value));
            }
            None => {
                self.0.remove(&nutrient);
            }
        }
    }

    pub fn with(mut self, nutrient: Nutrient, value: f64) -> Self {
        self.set(nutrient, Some(value));
        self
    }

    /// Present values in catalog order.
    pub fn present(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        Nutrient::ordered()
            .into_iter()
            .filter_map(|nutrient| self.get(nutrient).map(|value| (nutrient, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

impl FromIterator<(Nutrient, f64)> for NutrientValues {
    fn from_iter<I: IntoIterator<Item = (Nutrient, f64)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (nutrient, value) in iter {
            values.set(nutrient, Some(value));
        }
        values
    }
}

/// One soil test as submitted through the form or read from an import row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SoilRecord {
    #[serde(flatten)]
    pub metadata: CardMetadata,
    #[serde(default)]
    pub nutrients: NutrientValues,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl SoilRecord {
    /// Builds a record from raw form text. Unrecognised keys are ignored and
    /// numbers that fail to parse are treated as absent.
    pub fn from_form<'a, I>(fields: I, remarks: &str) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = SoilRecord::default();
        for (key, raw) in fields {
            if let Some(field) = MetadataField::from_key(key) {
                record.metadata.set(field, raw);
            } else if let Some(nutrient) = Nutrient::from_key(key) {
                record
                    .nutrients
                    .set(nutrient, raw.trim().parse::<f64>().ok());
            }
        }
        record.remarks = non_blank_verbatim(remarks);
        record
    }

    pub fn remarks(&self) -> Option<&str> {
        self.remarks
            .as_deref()
            .filter(|remarks| !remarks.trim().is_empty())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn non_blank_verbatim(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_input_normalises_bad_numbers_to_absent() {
        let record = SoilRecord::from_form(
            [
                ("farmer_name", "  Asha  "),
                ("selected_crop", ""),
                ("nitrogen", "200"),
                ("phosphorus", "twelve"),
                ("potassium", " "),
                ("favourite_colour", "green"),
            ],
            "\n",
        );

        assert_eq!(record.metadata.farmer_name.as_deref(), Some("Asha"));
        assert!(record.metadata.selected_crop.is_none());
        assert_eq!(record.nutrients.get(Nutrient::Nitrogen), Some(200.0));
        assert_eq!(record.nutrients.get(Nutrient::Phosphorus), None);
        assert_eq!(record.nutrients.get(Nutrient::Potassium), None);
        assert!(record.remarks().is_none());
    }

    #[test]
    fn remarks_keep_embedded_line_breaks() {
        let record = SoilRecord::from_form(std::iter::empty(), "line one\nline two");
        assert_eq!(record.remarks(), Some("line one\nline two"));
    }

    #[test]
    fn json_records_accept_null_nutrients() {
        let record: SoilRecord = serde_json::from_str(
            r#"{
                "farmer_name": "Asha",
                "selected_crop": "wheat",
                "nutrients": { "nitrogen": 200, "zinc": null }
            }"#,
        )
        .expect("record parses");

        assert_eq!(record.metadata.selected_crop.as_deref(), Some("wheat"));
        assert_eq!(
            record.nutrients.present().collect::<Vec<_>>(),
            vec![(Nutrient::Nitrogen, 200.0)]
        );
    }

    #[test]
    fn json_nutrient_keys_ignore_case_and_unknown_entries() {
        let record: SoilRecord = serde_json::from_str(
            r#"{
                "farmer_name": "Asha",
                "nutrients": { "Nitrogen": 200, "calcium": 5, "ZINC": 0.4 }
            }"#,
        )
        .expect("record parses");

        assert_eq!(record.nutrients.get(Nutrient::Nitrogen), Some(200.0));
        assert_eq!(record.nutrients.get(Nutrient::Zinc), Some(0.4));
        assert_eq!(record.nutrients.present().count(), 2);
    }

    #[test]
    fn json_nutrient_values_accept_numeric_text_only() {
        let record: SoilRecord = serde_json::from_str(
            r#"{
                "nutrients": {
                    "nitrogen": "200",
                    "ph": " 6.5 ",
                    "zinc": "abc",
                    "boron": true,
                    "iron": [1],
                    "copper": "NaN"
                }
            }"#,
        )
        .expect("record parses");

        assert_eq!(record.nutrients.get(Nutrient::Nitrogen), Some(200.0));
        assert_eq!(record.nutrients.get(Nutrient::Ph), Some(6.5));
        assert_eq!(record.nutrients.get(Nutrient::Zinc), None);
        assert_eq!(record.nutrients.get(Nutrient::Boron), None);
        assert_eq!(record.nutrients.get(Nutrient::Iron), None);
        assert_eq!(record.nutrients.get(Nutrient::Copper), None);
    }

    #[test]
    fn present_values_follow_catalog_order() {
        let values: NutrientValues = [(Nutrient::Copper, 0.3), (Nutrient::Nitrogen, 300.0)]
            .into_iter()
            .collect();
        let order: Vec<Nutrient> = values.present().map(|(nutrient, _)| nutrient).collect();
        assert_eq!(order, vec![Nutrient::Nitrogen, Nutrient::Copper]);
    }
}

use super::naming::normalize_header;
use super::RowError;
use crate::workflows::soil_card::{MetadataField, Nutrient, SoilRecord};
use csv::StringRecord;

/// Cell values read as "not available", in addition to blank cells.
const MISSING_TOKENS: [&str; 5] = ["na", "n/a", "nan", "null", "none"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnTarget {
    Metadata(MetadataField),
    Nutrient(Nutrient),
}

/// Resolves each header cell to the field it feeds; unknown columns map to
/// `None` and are skipped.
pub(crate) fn column_targets(headers: &StringRecord) -> Vec<Option<ColumnTarget>> {
    headers
        .iter()
        .map(|header| {
            let normalized = normalize_header(header);
            MetadataField::from_key(&normalized)
                .map(ColumnTarget::Metadata)
                .or_else(|| Nutrient::from_key(&normalized).map(ColumnTarget::Nutrient))
        })
        .collect()
}

pub(crate) fn record_from_row(
    headers: &StringRecord,
    targets: &[Option<ColumnTarget>],
    row: &StringRecord,
) -> Result<SoilRecord, RowError> {
    let mut record = SoilRecord::default();

    for (index, cell) in row.iter().enumerate() {
        match targets.get(index).copied().flatten() {
            Some(ColumnTarget::Metadata(field)) => record.metadata.set(field, cell),
            Some(ColumnTarget::Nutrient(nutrient)) => {
                let value = parse_measurement(cell).ok_or_else(|| RowError::InvalidNumber {
                    column: headers.get(index).unwrap_or_default().trim().to_string(),
                    value: cell.to_string(),
                })?;
                record.nutrients.set(nutrient, value);
            }
            None => {}
        }
    }

    Ok(record)
}

/// `Some(None)` for a missing reading, `Some(Some(v))` for a finite number,
/// `None` when the cell holds something that is not a number.
fn parse_measurement(cell: &str) -> Option<Option<f64>> {
    let trimmed = cell.trim();
    if trimmed.is_empty()
        || MISSING_TOKENS
            .iter()
            .any(|token| token.eq_ignore_ascii_case(trimmed))
    {
        return Some(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(Some(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> StringRecord {
        StringRecord::from(vec!["Farmer_Name", "NITROGEN", "ph", "Remarks", "zinc"])
    }

    #[test]
    fn maps_known_columns_and_ignores_others() {
        let targets = column_targets(&headers());
        assert_eq!(
            targets,
            vec![
                Some(ColumnTarget::Metadata(MetadataField::FarmerName)),
                Some(ColumnTarget::Nutrient(Nutrient::Nitrogen)),
                Some(ColumnTarget::Nutrient(Nutrient::Ph)),
                None,
                Some(ColumnTarget::Nutrient(Nutrient::Zinc)),
            ]
        );
    }

    #[test]
    fn blank_and_na_cells_are_absent() {
        let headers = headers();
        let targets = column_targets(&headers);
        let row = StringRecord::from(vec!["Asha", "200", "NA", "ignored", ""]);

        let record = record_from_row(&headers, &targets, &row).expect("row parses");

        assert_eq!(record.metadata.farmer_name.as_deref(), Some("Asha"));
        assert_eq!(record.nutrients.get(Nutrient::Nitrogen), Some(200.0));
        assert_eq!(record.nutrients.get(Nutrient::Ph), None);
        assert_eq!(record.nutrients.get(Nutrient::Zinc), None);
        assert!(record.remarks.is_none());
    }

    #[test]
    fn unparsable_numbers_fail_the_row() {
        let headers = headers();
        let targets = column_targets(&headers);
        let row = StringRecord::from(vec!["Asha", "lots", "6.5", "", "0.4"]);

        let error = record_from_row(&headers, &targets, &row).expect_err("bad nitrogen");

        match error {
            RowError::InvalidNumber { column, value } => {
                assert_eq!(column, "NITROGEN");
                assert_eq!(value, "lots");
            }
            other => panic!("expected invalid number, got {other:?}"),
        }
    }

    #[test]
    fn metadata_only_rows_still_parse() {
        let headers = headers();
        let targets = column_targets(&headers);
        let row = StringRecord::from(vec!["Asha", "", "", "note", ""]);

        let record = record_from_row(&headers, &targets, &row).expect("row parses");

        assert_eq!(record.metadata.farmer_name.as_deref(), Some("Asha"));
        assert!(record.nutrients.is_empty());
    }

    #[test]
    fn infinities_are_not_measurements() {
        assert_eq!(parse_measurement("inf"), None);
        assert_eq!(parse_measurement(" 1e2 "), Some(Some(100.0)));
        assert_eq!(parse_measurement("N/A"), Some(None));
    }
}

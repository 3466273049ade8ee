/// Keeps letters, digits, spaces, underscores and hyphens, then trims.
pub fn sanitize_file_stem(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `soil_card_<name>_<row>.<ext>`; rows without a usable name become
/// `soil_card_farmer_<row>.<ext>`. The row number is the final `_`-separated
/// segment, so distinct rows never share a file name.
pub fn bulk_card_file_name(farmer_name: Option<&str>, row: usize, extension: &str) -> String {
    let safe = sanitize_file_stem(farmer_name.unwrap_or_default());
    if safe.is_empty() {
        format!("soil_card_farmer_{row}.{extension}")
    } else {
        format!("soil_card_{safe}_{row}.{extension}")
    }
}

pub(crate) fn normalize_header(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_ascii_lowercase()
}

use super::{DocumentRenderer, RenderError};
use crate::workflows::soil_card::document::ReportDocument;

/// Writes the document model itself as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl DocumentRenderer for JsonRenderer {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, document: &ReportDocument) -> Result<Vec<u8>, RenderError> {
        serde_json::to_vec_pretty(document).map_err(|err| RenderError::Encode(err.to_string()))
    }
}

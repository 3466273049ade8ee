use super::catalog::Nutrient;
use super::classification::{self, NutrientReading};
use super::document::{CardBranding, ReportDocument};
use super::domain::SoilRecord;
use super::recommendation::{RecommendationEngine, RecommendationSet};
use super::render::{DocumentRenderer, RenderError};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Everything derived from one record on the way to a rendered card.
#[derive(Debug, Clone)]
pub struct CardContent {
    pub readings: Vec<NutrientReading>,
    pub recommendations: RecommendationSet,
    pub document: ReportDocument,
}

/// Runs classification, recommendation and document assembly for a record,
/// then hands the document to the configured renderer.
#[derive(Debug)]
pub struct SoilCardGenerator {
    renderer: Box<dyn DocumentRenderer>,
    recommendations: RecommendationEngine,
    branding: CardBranding,
}

impl SoilCardGenerator {
    pub fn new(renderer: Box<dyn DocumentRenderer>) -> Self {
        Self {
            renderer,
            recommendations: RecommendationEngine::new(),
            branding: CardBranding::default(),
        }
    }

    pub fn with_branding(mut self, branding: CardBranding) -> Self {
        self.branding = branding;
        self
    }

    pub fn file_extension(&self) -> &'static str {
        self.renderer.file_extension()
    }

    pub fn readings(record: &SoilRecord) -> Vec<NutrientReading> {
        Nutrient::ordered()
            .into_iter()
            .map(|nutrient| classification::read(nutrient, record.nutrients.get(nutrient)))
            .collect()
    }

    pub fn prepare(&self, record: &SoilRecord) -> CardContent {
        let readings = Self::readings(record);
        let recommendations = self
            .recommendations
            .recommend(&record.nutrients, record.metadata.selected_crop.as_deref());
        let document =
            ReportDocument::assemble(record, &readings, &recommendations, &self.branding);

        CardContent {
            readings,
            recommendations,
            document,
        }
    }

    pub fn generate(&self, record: &SoilRecord, path: &Path) -> Result<CardContent, CardError> {
        let content = self.prepare(record);
        self.renderer.render(&content.document, path)?;
        debug!(path = %path.display(), "soil health card written");
        Ok(content)
    }

    /// Writes the card into `directory` under its default file name and
    /// returns the path used.
    pub fn generate_into(
        &self,
        record: &SoilRecord,
        directory: &Path,
    ) -> Result<PathBuf, CardError> {
        let path = directory.join(single_card_file_name(
            record.metadata.farmer_name.as_deref(),
            self.file_extension(),
        ));
        self.generate(record, &path)?;
        Ok(path)
    }
}

/// `soil_card_<name>.<ext>`, using `user` when the name sanitises to nothing.
pub fn single_card_file_name(farmer_name: Option<&str>, extension: &str) -> String {
    let safe = crate::workflows::bulk::sanitize_file_stem(farmer_name.unwrap_or_default());
    let stem = if safe.is_empty() { "user" } else { safe.as_str() };
    format!("soil_card_{stem}.{extension}")
}

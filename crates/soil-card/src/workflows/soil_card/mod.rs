pub mod catalog;
pub mod classification;
pub mod document;
pub mod domain;
mod generator;
pub mod recommendation;
pub mod render;

pub use catalog::{Nutrient, NutrientCatalog, NutrientSpec};
pub use classification::{classify, classify_raw, NutrientReading, NutrientStatus, StatusTone};
pub use document::{Block, CardBranding, ReportDocument, Table, TableRow};
pub use domain::{CardMetadata, MetadataField, NutrientValues, SoilRecord};
pub use generator::{single_card_file_name, CardContent, CardError, SoilCardGenerator};
pub use recommendation::{Crop, RecommendationEngine, RecommendationSet, SupplyLevel};
pub use render::{DocumentRenderer, JsonRenderer, OutputFormat, PdfRenderer, RenderError};

use super::classification::{NutrientReading, StatusTone};
use super::domain::{CardMetadata, SoilRecord};
use super::recommendation::RecommendationSet;
use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";

/// Fixed wording printed on every card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardBranding {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
}

impl Default for CardBranding {
    fn default() -> Self {
        Self {
            title: "SOIL HEALTH CARD".to_string(),
            subtitle: "Soil & Water Department SDO Office, Tseminyu, Nagaland".to_string(),
            footer: "Developer: Achu Semy (SCA, Tseminyu, Nagaland)".to_string(),
        }
    }
}

/// Backend-agnostic card content: an ordered list of blocks that a renderer
/// lays out top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Title { text: String, subtitle: String },
    Heading { text: String },
    /// Label/value pairs laid out `columns` per line.
    Fields { columns: usize, fields: Vec<Field> },
    Table(Table),
    Paragraph { text: String },
    Footer { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: String,
}

impl Field {
    fn new(label: &str, value: Option<&str>) -> Self {
        Self {
            label: label.to_string(),
            value: value.unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub header: String,
    /// Share of the printable width, summing to 1.0 across a table.
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<StatusTone>,
}

impl ReportDocument {
    /// Lays out a card in its fixed section order. Readings without a value
    /// are left out of the nutrient table.
    pub fn assemble(
        record: &SoilRecord,
        readings: &[NutrientReading],
        recommendations: &RecommendationSet,
        branding: &CardBranding,
    ) -> Self {
        let mut blocks = vec![Block::Title {
            text: branding.title.clone(),
            subtitle: branding.subtitle.clone(),
        }];

        blocks.extend(metadata_blocks(&record.metadata));

        blocks.push(Block::Heading {
            text: "SOIL SAMPLE DETAILS".to_string(),
        });
        blocks.push(Block::Table(nutrient_table(readings)));

        blocks.push(Block::Heading {
            text: "RECOMMENDATIONS".to_string(),
        });
        blocks.push(Block::Table(recommendation_table(recommendations)));

        if let Some(remarks) = record.remarks() {
            blocks.push(Block::Heading {
                text: "ADDITIONAL REMARKS".to_string(),
            });
            blocks.push(Block::Paragraph {
                text: remarks.to_string(),
            });
        }

        blocks.push(Block::Footer {
            text: branding.footer.clone(),
        });

        Self {
            title: branding.title.clone(),
            blocks,
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    pub fn nutrient_table(&self) -> Option<&Table> {
        self.tables().next()
    }

    pub fn recommendation_table(&self) -> Option<&Table> {
        self.tables().nth(1)
    }
}

fn metadata_blocks(metadata: &CardMetadata) -> Vec<Block> {
    vec![
        Block::Fields {
            columns: 2,
            fields: vec![
                Field::new("Center Name", metadata.center_name.as_deref()),
                Field::new("Test ID", metadata.test_id.as_deref()),
                Field::new("Address", metadata.address.as_deref()),
                Field::new("Testing Date", metadata.testing_date.as_deref()),
            ],
        },
        Block::Heading {
            text: "CARD ISSUED TO".to_string(),
        },
        Block::Fields {
            columns: 1,
            fields: vec![
                Field::new("Name", metadata.farmer_name.as_deref()),
                Field::new("Address", metadata.farmer_address.as_deref()),
            ],
        },
        Block::Heading {
            text: "SAMPLE INFORMATION".to_string(),
        },
        Block::Fields {
            columns: 1,
            fields: vec![
                Field::new("Survey No.", metadata.survey_no.as_deref()),
                Field::new(
                    "Selected Crop",
                    Some(metadata.selected_crop.as_deref().unwrap_or(NOT_AVAILABLE)),
                ),
            ],
        },
    ]
}

fn nutrient_table(readings: &[NutrientReading]) -> Table {
    let rows = readings
        .iter()
        .filter_map(|reading| {
            let value = reading.value?;
            let spec = reading.nutrient.spec();
            Some(TableRow {
                cells: vec![
                    reading.nutrient.label(),
                    spec.display_value(value),
                    spec.range_text(),
                    reading.status.label().to_string(),
                ],
                tone: Some(reading.status.tone()),
            })
        })
        .collect();

    Table {
        columns: vec![
            column("Nutrient", 0.28),
            column("Value", 0.17),
            column("Range (L-M-H)", 0.33),
            column("Status", 0.22),
        ],
        rows,
    }
}

fn recommendation_table(recommendations: &RecommendationSet) -> Table {
    let buckets = recommendations.buckets();
    let row_count = buckets.iter().map(|bucket| bucket.len()).max().unwrap_or(0).max(1);

    let rows = (0..row_count)
        .map(|index| TableRow {
            cells: buckets
                .iter()
                .map(|bucket| match bucket.get(index) {
                    Some(entry) => (*entry).to_string(),
                    None if index == 0 => NOT_AVAILABLE.to_string(),
                    None => String::new(),
                })
                .collect(),
            tone: None,
        })
        .collect();

    Table {
        columns: vec![
            column("SOIL AMENDMENT", 0.333),
            column("FERTILIZER COMBO 1", 0.333),
            column("FERTILIZER COMBO 2", 0.334),
        ],
        rows,
    }
}

fn column(header: &str, width: f32) -> Column {
    Column {
        header: header.to_string(),
        width,
    }
}

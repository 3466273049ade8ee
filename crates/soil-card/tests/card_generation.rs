use soil_card::workflows::soil_card::{
    classify, Block, NutrientCatalog, NutrientStatus, OutputFormat, PdfRenderer, SoilCardGenerator,
    SoilRecord,
};

fn sample_record() -> SoilRecord {
    SoilRecord::from_form(
        [
            ("farmer_name", "Asha Devi"),
            ("center_name", "Tseminyu Soil Lab"),
            ("address", "Tseminyu"),
            ("test_id", "ST-0042"),
            ("testing_date", "2025-01-15"),
            ("survey_no", "114/2"),
            ("farmer_address", "Village Road"),
            ("selected_crop", "Rice"),
            ("nitrogen", "200"),
            ("phosphorus", "15"),
            ("potassium", "not measured"),
            ("ph", "4.8"),
            ("zinc", "0.4"),
        ],
        "Apply lime two weeks before transplanting.\nRetest after harvest.",
    )
}

#[test]
fn low_nitrogen_card_end_to_end() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("card.json");
    let generator = SoilCardGenerator::new(OutputFormat::Json.renderer());

    let content = generator
        .generate(&sample_record(), &path)
        .expect("card generated");

    let nitrogen = content
        .readings
        .iter()
        .find(|reading| reading.nutrient.key() == "nitrogen")
        .expect("nitrogen reading");
    assert_eq!(nitrogen.status, NutrientStatus::Low);
    assert_eq!(
        content.recommendations.fertilizer_combo_1,
        vec!["Urea @ 130 kg/ha"]
    );
    assert_eq!(
        content.recommendations.soil_amendment,
        vec!["Lime application @ 2-4 t/ha"]
    );
    assert_eq!(
        content.recommendations.fertilizer_combo_2,
        vec!["Zinc Sulphate @ 25 kg/ha"]
    );

    let nutrient_rows = content
        .document
        .nutrient_table()
        .expect("nutrient table")
        .rows
        .len();
    assert_eq!(nutrient_rows, 4, "potassium was unparsable and is omitted");

    assert!(content.document.blocks.iter().any(|block| matches!(
        block,
        Block::Paragraph { text } if text.contains('\n')
    )));

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).expect("card file")).expect("json card");
    assert_eq!(written["title"], "SOIL HEALTH CARD");
}

#[test]
fn pdf_card_contains_classified_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let generator = SoilCardGenerator::new(Box::new(PdfRenderer::new()));

    let path = generator
        .generate_into(&sample_record(), dir.path())
        .expect("card generated");

    assert_eq!(path.file_name().and_then(|name| name.to_str()), Some("soil_card_Asha Devi.pdf"));
    let text = String::from_utf8(std::fs::read(&path).expect("pdf readable")).expect("ascii pdf");
    assert!(text.contains("(LOW, DEFICIENT) Tj"));
    assert!(text.contains("(Urea @ 130 kg/ha) Tj"));
    assert!(text.contains("(Selected Crop: Rice) Tj"));
    assert!(text.contains("1.000 0.000 0.000 rg"));
}

#[test]
fn loosely_typed_json_record_still_produces_card() {
    let record: SoilRecord = serde_json::from_str(
        r#"{
            "farmer_name": "Asha",
            "nutrients": { "Nitrogen": 200, "calcium": 5, "zinc": "0.4" }
        }"#,
    )
    .expect("record parses");
    let generator = SoilCardGenerator::new(OutputFormat::Json.renderer());

    let content = generator.prepare(&record);

    let rows = &content.document.nutrient_table().expect("nutrient table").rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].cells[0], "Nitrogen");
    assert_eq!(rows[1].cells[0], "Zinc");
    assert_eq!(
        content.recommendations.fertilizer_combo_1,
        vec!["Urea @ 130 kg/ha"]
    );
}

#[test]
fn write_failure_leaves_no_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("missing-dir").join("card.pdf");
    let generator = SoilCardGenerator::new(Box::new(PdfRenderer::new()));

    let error = generator
        .generate(&sample_record(), &target)
        .expect_err("parent directory does not exist");

    assert!(error.to_string().contains("card.pdf"));
    assert!(!target.exists());
}

#[test]
fn classification_is_total_over_the_catalog() {
    for spec in NutrientCatalog::standard().specs() {
        assert_eq!(classify(spec.nutrient, Some(spec.medium)), NutrientStatus::Medium);
        assert_eq!(classify(spec.nutrient, Some(spec.medium * 1.001)), NutrientStatus::High);
        assert_eq!(classify(spec.nutrient, Some(spec.low * 0.999)), NutrientStatus::Low);
        assert_eq!(classify(spec.nutrient, None), NutrientStatus::NotAvailable);
    }
}

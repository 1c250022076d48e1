use plot_model::{CellValue, DataTable, PlotConfiguration, PlotKind};
use plotexport_core::vega::{config_from_document, SCHEMA};
use plotexport_core::{EmbedMode, ExportError, VegaDocumentBuilder};
use serde_json::json;
use std::sync::Arc;

fn source() -> Arc<DataTable> {
    let mut table = DataTable::with_range_index(4);
    table
        .add_column("a", (0..4).map(|v| CellValue::Float(v as f64 * 0.5)).collect())
        .unwrap();
    table
        .add_column("b", (0..4).map(CellValue::Int).collect())
        .unwrap();
    table
        .add_column("c", vec!["p".into(), "q".into(), "p".into(), "q".into()])
        .unwrap();
    Arc::new(table)
}

#[test]
fn inline_values_cover_rows_and_fields() {
    let config = PlotConfiguration::xy(PlotKind::Line, "a", "b", source());
    let doc = VegaDocumentBuilder::default()
        .document(&config, &EmbedMode::Inline)
        .unwrap();

    assert_eq!(doc["$schema"], SCHEMA);
    assert_eq!(doc["data"]["index-name"], "index");
    let values = doc["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), 4);
    for record in values {
        let keys: Vec<_> = record.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["index", "a", "b", "c"]);
    }
    assert_eq!(values[1], json!({"index": 1, "a": 0.5, "b": 1, "c": "q"}));
}

#[test]
fn csv_reference_writes_file_and_keeps_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("plot.csv");
    let arg = target.to_str().unwrap().to_string();
    let mode = EmbedMode::parse(&arg).unwrap();

    let config = PlotConfiguration::histogram("a", source());
    let doc = VegaDocumentBuilder::default().document(&config, &mode).unwrap();
    assert!(target.exists());
    assert_eq!(doc["data"], json!({"url": arg}));

    let again = VegaDocumentBuilder::default().document(&config, &mode);
    assert!(matches!(again, Err(ExportError::FileAlreadyExists(_))));
}

#[test]
fn named_reference_becomes_name_block() {
    let mode = EmbedMode::parse("shared_table").unwrap();
    let config = PlotConfiguration::histogram("a", source());
    let doc = VegaDocumentBuilder::default().document(&config, &mode).unwrap();
    assert_eq!(doc["data"], json!({"name": "shared_table"}));
}

#[test]
fn omitted_data_is_an_empty_block() {
    let config = PlotConfiguration::xy(PlotKind::Scatter, "a", "b", source()).with_color("c", false);
    let doc = VegaDocumentBuilder::default()
        .document(&config, &EmbedMode::from(false))
        .unwrap();
    assert_eq!(
        doc,
        json!({
            "$schema": SCHEMA,
            "data": {},
            "mark": "point",
            "encoding": {
                "x": {"field": "a", "type": "quantitative"},
                "y": {"field": "b", "type": "quantitative"},
                "color": {"field": "c", "type": "nominal"}
            }
        })
    );
}

#[test]
fn document_file_respects_overwrite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("doc.json");
    std::fs::write(&path, "original").unwrap();

    let doc = json!({"content": [], "datasets": {}});
    let result = VegaDocumentBuilder::new(false).write_document(&doc, &path, Some(4));
    assert!(matches!(result, Err(ExportError::FileAlreadyExists(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");

    VegaDocumentBuilder::new(true)
        .write_document(&doc, &path, Some(4))
        .unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, doc);
}

#[test]
fn written_document_reads_back() {
    let config =
        PlotConfiguration::xy(PlotKind::ColorScatter, "a", "b", source()).with_color("c", true);
    let doc = VegaDocumentBuilder::default()
        .document(&config, &EmbedMode::Reference("shared".to_string()))
        .unwrap();
    let back = config_from_document(&doc, source()).unwrap();
    assert_eq!(back.kind, PlotKind::ColorScatter);
    assert_eq!(back.z.as_deref(), Some("c"));
    assert!(back.continuous_color);
}

use plot_model::{
    CellValue, DataTable, ModelError, PlotCollection, PlotConfiguration, PlotKind,
    PLOT_DATA_TABLE,
};
use std::sync::Arc;

fn source() -> Arc<DataTable> {
    let mut table = DataTable::new(
        Some("sample".to_string()),
        vec!["s1".into(), "s2".into()],
    );
    table
        .add_column("a", vec![CellValue::Float(0.5), CellValue::Float(1.5)])
        .unwrap();
    table
        .add_column("b", vec![CellValue::Int(10), CellValue::Int(20)])
        .unwrap();
    table
        .add_column("c", vec!["red".into(), "blue".into()])
        .unwrap();
    Arc::new(table)
}

#[test]
fn plot_kind_names_round_trip() {
    for kind in PlotKind::ALL {
        assert_eq!(PlotKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(PlotKind::from_name("Color Scatter"), Some(PlotKind::ColorScatter));
    assert_eq!(PlotKind::from_name("heatmap"), None);
}

#[test]
fn plot_kind_serializes_kebab_case() {
    let value = serde_json::to_value(PlotKind::ColorScatter).unwrap();
    assert_eq!(value, serde_json::json!("color-scatter"));
}

#[test]
fn histogram_ignores_y_column() {
    let mut config = PlotConfiguration::histogram("a", source());
    config.y = Some("b".to_string());
    assert_eq!(config.columns(), vec!["a"]);
}

#[test]
fn plot_tables_select_configured_columns() {
    let config = PlotConfiguration::xy(PlotKind::Scatter, "a", "b", source()).with_color("c", false);
    let tables = config.tables().unwrap();
    assert_eq!(tables.len(), 1);
    let (name, table) = &tables[0];
    assert_eq!(name, PLOT_DATA_TABLE);
    assert_eq!(table.column_names(), vec!["a", "b", "c"]);
    assert_eq!(table.index_label(), "sample");
}

#[test]
fn plot_tables_fail_on_unknown_column() {
    let config = PlotConfiguration::xy(PlotKind::Line, "a", "missing", source());
    assert_eq!(
        config.tables().unwrap_err(),
        ModelError::MissingColumn("missing".to_string())
    );
}

#[test]
fn exportable_skips_hidden_plots_in_order() {
    let src = source();
    let mut collection = PlotCollection::new(src.clone());
    collection.push("first", PlotConfiguration::histogram("a", src.clone()), true);
    collection.push("second", PlotConfiguration::histogram("b", src.clone()), false);
    collection.push("third", PlotConfiguration::histogram("a", src), true);

    let visible: Vec<usize> = collection.exportable(true).map(|(idx, _)| idx).collect();
    assert_eq!(visible, vec![0, 2]);

    let all: Vec<&str> = collection
        .exportable(false)
        .map(|(_, desc)| desc.title.as_str())
        .collect();
    assert_eq!(all, vec!["first", "second", "third"]);
}

//! Rebuilding plot configurations from Vega-Lite documents written by this
//! crate.

use super::document::SCHEMA;
use crate::ExportError;
use plot_model::{DataTable, PlotConfiguration, PlotKind};
use serde_json::Value;
use std::sync::Arc;

fn invalid(msg: impl Into<String>) -> ExportError {
    ExportError::InvalidVegaDocument(msg.into())
}

fn field<'a>(encoding: &'a Value, channel: &str) -> Option<&'a str> {
    encoding.get(channel)?.get("field")?.as_str()
}

fn mark_name(doc: &Value) -> Option<&str> {
    match doc.get("mark")? {
        Value::String(name) => Some(name),
        Value::Object(mark) => mark.get("type")?.as_str(),
        _ => None,
    }
}

/// Plot configuration described by a single-plot document.
pub fn config_from_document(
    doc: &Value,
    source: Arc<DataTable>,
) -> Result<PlotConfiguration, ExportError> {
    let schema = doc
        .get("$schema")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing $schema"))?;
    if schema != SCHEMA {
        return Err(ExportError::UnsupportedVegaSchemaVersion(schema.to_string()));
    }

    let mark = mark_name(doc).ok_or_else(|| invalid("missing mark"))?;
    let encoding = doc
        .get("encoding")
        .ok_or_else(|| invalid("missing encoding"))?;
    let x = field(encoding, "x").ok_or_else(|| invalid("encoding has no x field"))?;
    let y = || field(encoding, "y").ok_or_else(|| invalid("encoding has no y field"));

    let config = match mark {
        "bar" => PlotConfiguration::histogram(x, source),
        "line" => PlotConfiguration::xy(PlotKind::Line, x, y()?, source),
        "point" => match encoding.get("color") {
            Some(color) => {
                let z = color
                    .get("field")
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid("color channel has no field"))?;
                let continuous =
                    color.get("type").and_then(Value::as_str) == Some("quantitative");
                PlotConfiguration::xy(PlotKind::ColorScatter, x, y()?, source)
                    .with_color(z, continuous)
            }
            None => PlotConfiguration::xy(PlotKind::Scatter, x, y()?, source),
        },
        other => return Err(ExportError::UnsupportedPlotKind(other.to_string())),
    };
    Ok(config)
}

/// Configurations of every plot in a `{"content": [...]}` document, or of
/// the document itself when it describes a single plot.
pub fn configs_from_document(
    doc: &Value,
    source: Arc<DataTable>,
) -> Result<Vec<PlotConfiguration>, ExportError> {
    match doc.get("content") {
        Some(Value::Array(plots)) => plots
            .iter()
            .map(|plot| config_from_document(plot, source.clone()))
            .collect(),
        Some(_) => Err(invalid("content is not a list")),
        None => Ok(vec![config_from_document(doc, source)?]),
    }
}

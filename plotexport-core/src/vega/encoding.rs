use crate::ExportError;
use plot_model::{PlotConfiguration, PlotKind};
use serde_json::{json, Value};

/// Vega-Lite mark drawn for each plot kind.
pub fn mark_for_kind(kind: PlotKind) -> &'static str {
    match kind {
        PlotKind::Histogram => "bar",
        PlotKind::Line => "line",
        PlotKind::Scatter | PlotKind::ColorScatter => "point",
    }
}

/// Plot kind given by name, e.g. from a manifest. Names with no Vega-Lite
/// mark are rejected.
pub fn kind_for_name(name: &str) -> Result<PlotKind, ExportError> {
    PlotKind::from_name(name).ok_or_else(|| ExportError::UnsupportedPlotKind(name.to_string()))
}

fn quantitative(field: &str) -> Value {
    json!({"field": field, "type": "quantitative"})
}

/// `mark` and `encoding` for one plot configuration. Pure: the same
/// configuration always yields the same fragment.
pub fn encoding(config: &PlotConfiguration) -> Result<Value, ExportError> {
    let mark = mark_for_kind(config.kind);
    let encoding = match config.kind {
        PlotKind::Histogram => json!({
            "x": {"bin": true, "field": config.x, "type": "quantitative"},
            "y": {"aggregate": "count", "type": "quantitative"},
        }),
        PlotKind::Line | PlotKind::Scatter | PlotKind::ColorScatter => {
            let y = config.y.as_deref().ok_or_else(|| {
                ExportError::UnsupportedPlotKind(format!("{} without a y column", config.kind))
            })?;
            let mut channels = json!({
                "x": quantitative(&config.x),
                "y": quantitative(y),
            });
            if let Some(z) = config.z.as_deref() {
                let color_type = if config.continuous_color {
                    "quantitative"
                } else {
                    "nominal"
                };
                channels["color"] = json!({"field": z, "type": color_type});
            }
            channels
        }
    };
    Ok(json!({"mark": mark, "encoding": encoding}))
}

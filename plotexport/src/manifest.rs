use plot_model::{DataTable, PlotCollection, PlotConfiguration, PlotKind};
use plotexport_core::vega::kind_for_name;
use plotexport_core::{read_table, DataFormat, ExportError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Plot collection described in JSON: a CSV source table plus the plots
/// drawn from it.
#[derive(Debug, Deserialize)]
pub struct Manifest {
    /// CSV file, relative to the manifest.
    pub source: PathBuf,
    /// First CSV column is the row index.
    #[serde(default)]
    pub index_column: bool,
    #[serde(default)]
    pub plots: Vec<PlotEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PlotEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    pub kind: String,
    pub x: String,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub z: Option<String>,
    #[serde(default)]
    pub continuous_color: bool,
}

fn visible_by_default() -> bool {
    true
}

pub struct LoadedManifest {
    pub manifest: Manifest,
    pub source: Arc<DataTable>,
}

pub fn load_manifest(path: &Path) -> Result<LoadedManifest, ExportError> {
    let data = std::fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&data)?;
    let source_path = match path.parent() {
        Some(dir) if manifest.source.is_relative() => dir.join(&manifest.source),
        _ => manifest.source.clone(),
    };
    let source = read_table(&source_path, DataFormat::Csv, "", manifest.index_column)?;
    log::debug!(
        "loaded {} rows from {} for {} plot(s)",
        source.n_rows(),
        source_path.display(),
        manifest.plots.len()
    );
    Ok(LoadedManifest {
        manifest,
        source: Arc::new(source),
    })
}

fn configuration(
    entry: &PlotEntry,
    source: Arc<DataTable>,
) -> Result<PlotConfiguration, ExportError> {
    let kind = kind_for_name(&entry.kind)?;
    let mut config = match (kind, entry.y.as_deref()) {
        (PlotKind::Histogram, _) => PlotConfiguration::histogram(entry.x.as_str(), source),
        (kind, Some(y)) => PlotConfiguration::xy(kind, entry.x.as_str(), y, source),
        (kind, None) => {
            return Err(ExportError::UnsupportedPlotKind(format!(
                "{kind} without a y column"
            )))
        }
    };
    if let Some(z) = entry.z.as_deref() {
        config = config.with_color(z, entry.continuous_color);
    }
    // fail on unknown columns before anything is written
    config.tables()?;
    Ok(config)
}

impl LoadedManifest {
    pub fn collection(&self) -> Result<PlotCollection, ExportError> {
        let mut collection = PlotCollection::new(self.source.clone());
        for entry in &self.manifest.plots {
            let config = configuration(entry, self.source.clone())?;
            collection.push(entry.title.clone(), config, entry.visible);
        }
        Ok(collection)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub mod table;
pub use table::{CellValue, Column, DataTable, DEFAULT_INDEX_LABEL};

/// Name of the single sub-table every plot configuration produces.
pub const PLOT_DATA_TABLE: &str = "plot_data";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("column '{0}' not found in source table")]
    MissingColumn(String),
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),
    #[error("column '{column}' has {found} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlotKind {
    Histogram,
    Line,
    Scatter,
    ColorScatter,
}

impl PlotKind {
    pub const ALL: [PlotKind; 4] = [
        PlotKind::Histogram,
        PlotKind::Line,
        PlotKind::Scatter,
        PlotKind::ColorScatter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlotKind::Histogram => "histogram",
            PlotKind::Line => "line",
            PlotKind::Scatter => "scatter",
            PlotKind::ColorScatter => "color-scatter",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "histogram" | "hist" => Some(PlotKind::Histogram),
            "line" => Some(PlotKind::Line),
            "scatter" => Some(PlotKind::Scatter),
            "color-scatter" | "cmap-scatter" | "colored-scatter" => Some(PlotKind::ColorScatter),
            _ => None,
        }
    }

    pub fn uses_y(self) -> bool {
        !matches!(self, PlotKind::Histogram)
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque reference to a rendered plot, resolved by the renderer collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotHandle(pub u64);

#[derive(Debug, Clone)]
pub struct PlotConfiguration {
    pub kind: PlotKind,
    pub x: String,
    pub y: Option<String>,
    pub z: Option<String>,
    pub continuous_color: bool,
    pub source: Arc<DataTable>,
}

impl PlotConfiguration {
    pub fn histogram(x: impl Into<String>, source: Arc<DataTable>) -> Self {
        Self {
            kind: PlotKind::Histogram,
            x: x.into(),
            y: None,
            z: None,
            continuous_color: false,
            source,
        }
    }

    pub fn xy(
        kind: PlotKind,
        x: impl Into<String>,
        y: impl Into<String>,
        source: Arc<DataTable>,
    ) -> Self {
        Self {
            kind,
            x: x.into(),
            y: Some(y.into()),
            z: None,
            continuous_color: false,
            source,
        }
    }

    pub fn with_color(mut self, z: impl Into<String>, continuous: bool) -> Self {
        self.z = Some(z.into());
        self.continuous_color = continuous;
        self
    }

    /// Column names this plot reads, in x, y, z order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![self.x.as_str()];
        if self.kind.uses_y() {
            if let Some(y) = self.y.as_deref() {
                columns.push(y);
            }
        }
        if let Some(z) = self.z.as_deref() {
            columns.push(z);
        }
        columns
    }

    /// Named sub-tables this plot can export.
    pub fn tables(&self) -> Result<Vec<(String, DataTable)>, ModelError> {
        let data = self.source.select(&self.columns())?;
        Ok(vec![(PLOT_DATA_TABLE.to_string(), data)])
    }
}

#[derive(Debug, Clone)]
pub struct PlotDescriptor {
    pub handle: PlotHandle,
    pub config: PlotConfiguration,
    pub title: String,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct PlotCollection {
    pub plots: Vec<PlotDescriptor>,
    pub source: Arc<DataTable>,
}

impl PlotCollection {
    pub fn new(source: Arc<DataTable>) -> Self {
        Self {
            plots: Vec::new(),
            source,
        }
    }

    pub fn push(&mut self, title: impl Into<String>, config: PlotConfiguration, visible: bool) {
        let handle = PlotHandle(self.plots.len() as u64);
        self.plots.push(PlotDescriptor {
            handle,
            config,
            title: title.into(),
            visible,
        });
    }

    /// Plots to export paired with their position in the collection.
    pub fn exportable(&self, skip_hidden: bool) -> impl Iterator<Item = (usize, &PlotDescriptor)> {
        self.plots
            .iter()
            .enumerate()
            .filter(move |(_, desc)| desc.visible || !skip_hidden)
    }
}

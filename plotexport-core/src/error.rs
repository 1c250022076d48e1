use plot_model::ModelError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("plot kind '{0}' has no Vega-Lite mapping")]
    UnsupportedPlotKind(String),
    #[error("invalid export data argument: '{0}'")]
    InvalidExportDataArgument(String),
    #[error("file already exists: {}", .0.display())]
    FileAlreadyExists(PathBuf),
    #[error("unsupported Vega-Lite schema: '{0}'")]
    UnsupportedVegaSchemaVersion(String),
    #[error("data export mode '{mode}' is not available for {target} export")]
    InvalidDataExportMode { mode: String, target: String },
    #[error("invalid Vega-Lite document: {0}")]
    InvalidVegaDocument(String),
    #[error("invalid export options: {0}")]
    Options(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("presentation error: {0}")]
    Presentation(String),
    #[error("excel error: {0}")]
    Excel(String),
    #[error("hdf5 error: {0}")]
    Hdf5(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

#[cfg(feature = "hdf5")]
impl From<hdf5::Error> for ExportError {
    fn from(err: hdf5::Error) -> Self {
        ExportError::Hdf5(err.to_string())
    }
}

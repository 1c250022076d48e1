pub mod collaborators;
pub mod error;
pub mod exporter;
pub mod format;
pub mod multi_table;
pub mod options;
pub mod paths;
pub mod tabular;
pub mod vega;

pub use collaborators::{DeckHandle, LogNotifier, Notifier, PlotRenderer, PresentationBuilder};
pub use error::ExportError;
pub use exporter::{image_file_name, ExportOutcome, PlotManagerExporter};
pub use format::{DataFormat, ImageFormat};
pub use multi_table::export_collection_data;
pub use options::{
    legal_data_modes, load_options_file, save_options_file, DataExportMode, ExportOptions,
    TargetFormat,
};
pub use tabular::{export_table, read_table, TableExportSettings, SOURCE_TABLE_KEY};
pub use vega::{EmbedMode, VegaDocumentBuilder};

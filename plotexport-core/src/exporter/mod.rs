//! Plot-manager export: drives one export of a plot collection to an image
//! folder, a slide deck or a Vega-Lite document.

mod images;
mod slides;
mod vega_document;

use crate::collaborators::{LogNotifier, Notifier, PlotRenderer, PresentationBuilder};
use crate::multi_table::export_collection_data;
use crate::options::{normalize_export_options, DataExportMode, ExportOptions, TargetFormat};
use crate::tabular::{export_table, TableExportSettings, SOURCE_TABLE_KEY};
use crate::ExportError;
use plot_model::PlotCollection;
use std::path::PathBuf;

pub use self::images::image_file_name;

/// Files produced by a finished export.
#[derive(Debug, Default, Clone)]
pub struct ExportOutcome {
    /// Images, deck or document, in the order they were written.
    pub files: Vec<PathBuf>,
    pub data_file: Option<PathBuf>,
    /// The assembled document of a Vega-Lite export.
    pub document: Option<serde_json::Value>,
}

pub struct PlotManagerExporter {
    options: ExportOptions,
    renderer: Option<Box<dyn PlotRenderer>>,
    presentation: Option<Box<dyn PresentationBuilder>>,
    notifier: Box<dyn Notifier>,
}

impl PlotManagerExporter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options: normalize_export_options(options),
            renderer: None,
            presentation: None,
            notifier: Box::new(LogNotifier),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn PlotRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_presentation(mut self, presentation: Box<dyn PresentationBuilder>) -> Self {
        self.presentation = Some(presentation);
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Runs the export selected by the options. Any failure aborts the whole
    /// export; files already written stay on disk.
    pub fn export(&mut self, collection: &PlotCollection) -> Result<ExportOutcome, ExportError> {
        let target = self.options.target;
        match self.run(collection) {
            Ok(outcome) => {
                log::info!(
                    "{target} export finished: {} file(s) in {}",
                    outcome.files.len(),
                    self.options.destination.display()
                );
                if self.options.interactive {
                    if let Some(data) = &outcome.data_file {
                        self.notifier
                            .info(&format!("Data exported to {}", data.display()));
                    }
                    self.notifier.info(&format!(
                        "Exported {} plot output(s) to {}",
                        outcome.files.len(),
                        self.options.destination.display()
                    ));
                }
                Ok(outcome)
            }
            Err(err) => {
                log::error!("{target} export failed: {err}");
                if self.options.interactive {
                    self.notifier.error(&format!("Export failed: {err}"));
                }
                Err(err)
            }
        }
    }

    fn run(&mut self, collection: &PlotCollection) -> Result<ExportOutcome, ExportError> {
        self.options.validate()?;
        match self.options.target {
            TargetFormat::ImageFolder => self.export_images(collection),
            TargetFormat::SlideDeck => self.export_slides(collection),
            TargetFormat::VegaDocument => self.export_vega(collection),
        }
    }
}

fn table_settings(options: &ExportOptions) -> TableExportSettings {
    TableExportSettings {
        base_name: options.data_base_name().to_string(),
        include_index: options.include_index,
        overwrite: options.overwrite,
        compression_level: options.hdf5.compression_level,
    }
}

/// Data export for the image and slide targets: the whole collection when
/// per-plot data is requested, otherwise the shared source table.
fn export_data(
    options: &ExportOptions,
    collection: &PlotCollection,
) -> Result<Option<PathBuf>, ExportError> {
    if options.export_data != DataExportMode::Yes {
        return Ok(None);
    }
    let settings = table_settings(options);
    let path = if options.export_each_plot_data {
        export_collection_data(
            collection,
            &options.destination,
            options.data_format,
            &settings,
            options.skip_hidden,
        )?
    } else {
        export_table(
            &options.destination,
            &collection.source,
            SOURCE_TABLE_KEY,
            options.data_format,
            &settings,
        )?
    };
    Ok(Some(path))
}

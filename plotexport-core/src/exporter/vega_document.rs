use super::{ExportOutcome, PlotManagerExporter};
use crate::format::DataFormat;
use crate::options::DataExportMode;
use crate::paths::ensure_dir;
use crate::tabular::{export_table, SOURCE_TABLE_KEY};
use crate::vega::{EmbedMode, VegaDocumentBuilder};
use crate::ExportError;
use plot_model::PlotCollection;
use serde_json::{json, Map, Value};

impl PlotManagerExporter {
    /// Builds `{"content": [...], "datasets": {...}}` for the exported plots
    /// and writes it when a document file name is set. Each `content` item is
    /// a complete single-plot Vega-Lite document, so besides `mark`,
    /// `encoding` and `data` it also carries its own `$schema`.
    pub(super) fn export_vega(
        &self,
        collection: &PlotCollection,
    ) -> Result<ExportOutcome, ExportError> {
        let options = &self.options;
        ensure_dir(&options.destination)?;
        let base = options.data_base_name();
        let builder = VegaDocumentBuilder {
            overwrite: options.overwrite,
            include_index: options.include_index,
        };

        let mut datasets = Map::new();
        let mut data_file = None;
        let mode = match options.export_data {
            DataExportMode::None => EmbedMode::Omit,
            DataExportMode::Inline => EmbedMode::Inline,
            DataExportMode::InFile => {
                datasets.insert(base.to_string(), Value::Array(collection.source.records()));
                EmbedMode::Reference(base.to_string())
            }
            DataExportMode::SeparateFile => {
                let path = export_table(
                    &options.destination,
                    &collection.source,
                    SOURCE_TABLE_KEY,
                    DataFormat::Csv,
                    &super::table_settings(options),
                )?;
                data_file = Some(path);
                EmbedMode::Url(format!("{base}.csv"))
            }
            DataExportMode::Yes => {
                return Err(ExportError::InvalidDataExportMode {
                    mode: options.export_data.to_string(),
                    target: options.target.to_string(),
                })
            }
        };
        log::debug!("data mode {} embeds as {mode:?}", options.export_data);

        let content = collection
            .exportable(options.skip_hidden)
            .map(|(_, desc)| builder.document(&desc.config, &mode))
            .collect::<Result<Vec<_>, _>>()?;
        let document = json!({"content": content, "datasets": datasets});

        let mut files = Vec::new();
        if let Some(name) = &options.vega.file_name {
            let path = options.destination.join(name);
            builder.write_document(&document, &path, options.vega.indent)?;
            files.push(path);
        }
        Ok(ExportOutcome {
            files,
            data_file,
            document: Some(document),
        })
    }
}

use crate::commands::Commands;
use crate::manifest::load_manifest;
use crate::output::*;
use plotexport_core::vega::configs_from_document;
use plotexport_core::{
    export_collection_data, export_table, legal_data_modes, load_options_file, DataExportMode,
    DataFormat, ExportOptions, PlotManagerExporter, TableExportSettings, TargetFormat,
    SOURCE_TABLE_KEY,
};
use std::path::{Path, PathBuf};

pub fn handle_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Vega {
            manifest,
            out,
            options,
            data_mode,
            indent,
            compact,
            include_hidden,
            overwrite,
        } => {
            let mut opts = match options {
                Some(path) => load_options_file(&path)?,
                None => ExportOptions::default(),
            };
            opts.target = TargetFormat::VegaDocument;
            opts.destination = out;
            opts.interactive = false;
            if let Some(mode) = data_mode {
                opts.export_data = DataExportMode::from_name(&mode)
                    .ok_or_else(|| format!("unknown data-export mode '{mode}'"))?;
            }
            if compact {
                opts.vega.indent = None;
            } else if indent.is_some() {
                opts.vega.indent = indent;
            }
            opts.skip_hidden = opts.skip_hidden && !include_hidden;
            opts.overwrite = opts.overwrite || overwrite;
            handle_vega(&manifest, opts)?;
        }
        Commands::Data {
            manifest,
            out,
            format,
            name,
            per_plot,
            no_index,
            overwrite,
        } => {
            let format: DataFormat = format.parse()?;
            let settings = TableExportSettings {
                base_name: name.unwrap_or_else(|| {
                    plotexport_core::options::DEFAULT_DATA_FILE_NAME.to_string()
                }),
                include_index: !no_index,
                overwrite,
                ..TableExportSettings::default()
            };
            handle_data(&manifest, &out, format, &settings, per_plot)?;
        }
        Commands::Modes { target } => {
            let target = TargetFormat::from_name(&target)
                .ok_or_else(|| format!("unknown export target '{target}'"))?;
            print_modes(target, legal_data_modes(target));
        }
        Commands::Inspect { document, manifest } => handle_inspect(&document, &manifest)?,
    }
    Ok(())
}

fn handle_vega(
    manifest: &Path,
    options: ExportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection = load_manifest(manifest)?.collection()?;
    log::debug!(
        "vega export of {} plot(s) with data mode {}",
        collection.plots.len(),
        options.export_data
    );
    let outcome = PlotManagerExporter::new(options).export(&collection)?;
    print_outcome(&outcome);
    Ok(())
}

fn handle_data(
    manifest: &Path,
    out: &Path,
    format: DataFormat,
    settings: &TableExportSettings,
    per_plot: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = load_manifest(manifest)?;
    std::fs::create_dir_all(out)?;
    let path: PathBuf = if per_plot {
        export_collection_data(&loaded.collection()?, out, format, settings, true)?
    } else {
        export_table(out, &loaded.source, SOURCE_TABLE_KEY, format, settings)?
    };
    print_info(&format!("Data written to {}", path.display()));
    Ok(())
}

fn handle_inspect(document: &Path, manifest: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = load_manifest(manifest)?;
    let data = std::fs::read_to_string(document)?;
    let doc: serde_json::Value = serde_json::from_str(&data)?;
    let configs = configs_from_document(&doc, loaded.source.clone())?;
    print_configurations(&configs);
    Ok(())
}

use crate::format::DataFormat;
use crate::paths::{check_overwrite, file_in_dir};
use crate::tabular::{
    open_sink, write_scoped, CsvBundleSink, TableExportSettings, TableSink, SOURCE_TABLE_KEY,
};
use crate::ExportError;
use plot_model::{DataTable, PlotCollection};
use std::path::{Path, PathBuf};

/// Key of a plot sub-table: `<plot index>_<table name>`.
pub fn plot_table_key(plot_index: usize, table_name: &str) -> String {
    format!("{plot_index}_{table_name}")
}

/// Every per-plot sub-table of the exported plots, keyed and in collection order.
pub fn plot_tables(
    collection: &PlotCollection,
    skip_hidden: bool,
) -> Result<Vec<(String, DataTable)>, ExportError> {
    let mut tables = Vec::new();
    for (idx, desc) in collection.exportable(skip_hidden) {
        for (name, table) in desc.config.tables()? {
            tables.push((plot_table_key(idx, &name), table));
        }
    }
    Ok(tables)
}

/// Final file for a multi-table export. Several CSV tables end up in a zip
/// archive; other formats hold every table in one file.
pub fn collection_destination(
    destination: &Path,
    base_name: &str,
    format: DataFormat,
    table_count: usize,
) -> PathBuf {
    let extension = if format == DataFormat::Csv && table_count > 1 {
        "zip"
    } else {
        format.extension()
    };
    if destination.is_dir() {
        file_in_dir(destination, base_name, extension)
    } else {
        destination.with_extension(extension)
    }
}

/// Writes the shared source table plus every sub-table of each exported plot
/// to one destination.
pub fn export_collection_data(
    collection: &PlotCollection,
    destination: &Path,
    format: DataFormat,
    settings: &TableExportSettings,
    skip_hidden: bool,
) -> Result<PathBuf, ExportError> {
    let tables = plot_tables(collection, skip_hidden)?;
    let path = collection_destination(destination, &settings.base_name, format, tables.len() + 1);
    check_overwrite(&path, settings.overwrite)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let sink: Box<dyn TableSink> = match format {
        DataFormat::Csv => Box::new(CsvBundleSink::new(&path, settings.include_index)?),
        _ => open_sink(&path, format, settings)?,
    };
    let written = write_scoped(sink, |sink| {
        sink.write_table(SOURCE_TABLE_KEY, &collection.source)?;
        for (key, table) in &tables {
            sink.write_table(key, table)?;
        }
        Ok(())
    })?;
    log::info!(
        "exported {} tables as {format} to {}",
        tables.len() + 1,
        written.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_destination_switches_to_zip_for_many_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(
            collection_destination(dir.path(), "data", DataFormat::Csv, 3),
            dir.path().join("data.zip")
        );
        assert_eq!(
            collection_destination(dir.path(), "data", DataFormat::Csv, 1),
            dir.path().join("data.csv")
        );
        assert_eq!(
            collection_destination(dir.path(), "data", DataFormat::Xlsx, 3),
            dir.path().join("data.xlsx")
        );
    }

    #[test]
    fn file_destination_gets_format_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("export.csv");
        assert_eq!(
            collection_destination(&file, "data", DataFormat::Csv, 2),
            dir.path().join("export.zip")
        );
    }
}

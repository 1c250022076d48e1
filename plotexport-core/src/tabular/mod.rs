//! Writing and reading single tables in the supported data formats.
//!
//! Every format is driven through a [`TableSink`], the open writer or store
//! a table is written into under a key. Sinks are always driven through
//! [`write_scoped`]: they are closed when every write succeeded and aborted
//! otherwise, so a failed export never leaves a finished-looking file.

mod csv_file;
mod excel;
#[cfg(feature = "hdf5")]
mod hdf5_store;

use crate::format::DataFormat;
use crate::paths::{check_overwrite, resolve_destination};
use crate::ExportError;
use plot_model::{CellValue, DataTable};
use std::path::{Path, PathBuf};

pub use self::csv_file::{read_csv, CsvBundleSink, CsvFileSink};
pub use self::excel::{read_excel, sheet_name_for, ExcelSink};

/// Key used when the shared source table is written.
pub const SOURCE_TABLE_KEY: &str = "dataset_source";

#[derive(Debug, Clone)]
pub struct TableExportSettings {
    /// File stem used when the destination is a directory.
    pub base_name: String,
    pub include_index: bool,
    pub overwrite: bool,
    /// Deflate level for HDF5 datasets, 0 disables compression.
    pub compression_level: u8,
}

impl Default for TableExportSettings {
    fn default() -> Self {
        Self {
            base_name: crate::options::DEFAULT_DATA_FILE_NAME.to_string(),
            include_index: true,
            overwrite: false,
            compression_level: 0,
        }
    }
}

/// Open writer or store that tables are written into under a key.
pub trait TableSink {
    fn write_table(&mut self, key: &str, table: &DataTable) -> Result<(), ExportError>;

    /// Flushes and releases the underlying handle, returning the final file.
    fn close(self: Box<Self>) -> Result<PathBuf, ExportError>;

    /// Releases the underlying handle after a failed write and discards the
    /// partial output instead of publishing it.
    fn abort(self: Box<Self>) -> Result<(), ExportError>;
}

/// Runs `body` against `sink`, closing the sink when the body succeeds and
/// aborting it when it fails. The body's error wins over an abort failure.
pub fn write_scoped<F>(mut sink: Box<dyn TableSink>, body: F) -> Result<PathBuf, ExportError>
where
    F: FnOnce(&mut dyn TableSink) -> Result<(), ExportError>,
{
    match body(sink.as_mut()) {
        Ok(()) => sink.close(),
        Err(err) => {
            if let Err(abort_err) = sink.abort() {
                log::error!("failed to release table writer after error: {abort_err}");
            }
            Err(err)
        }
    }
}

/// Removes the partial file a sink left at `path`, if any.
pub(crate) fn remove_partial(path: &Path) -> Result<(), ExportError> {
    if path.exists() {
        std::fs::remove_file(path)?;
        log::debug!("removed partial output {}", path.display());
    }
    Ok(())
}

/// Opens a sink writing every table into the single file at `path`.
/// CSV holds only one table per file; use [`CsvBundleSink`] for several.
pub fn open_sink(
    path: &Path,
    format: DataFormat,
    settings: &TableExportSettings,
) -> Result<Box<dyn TableSink>, ExportError> {
    match format {
        DataFormat::Csv => Ok(Box::new(CsvFileSink::new(path, settings.include_index))),
        DataFormat::Xlsx => Ok(Box::new(ExcelSink::create(path, settings.include_index)?)),
        DataFormat::Hdf5 => open_hdf5_sink(path, settings),
    }
}

#[cfg(feature = "hdf5")]
fn open_hdf5_sink(
    path: &Path,
    settings: &TableExportSettings,
) -> Result<Box<dyn TableSink>, ExportError> {
    Ok(Box::new(self::hdf5_store::Hdf5Sink::create(
        path,
        settings.compression_level,
    )?))
}

#[cfg(not(feature = "hdf5"))]
fn open_hdf5_sink(
    _path: &Path,
    _settings: &TableExportSettings,
) -> Result<Box<dyn TableSink>, ExportError> {
    Err(hdf5_disabled())
}

#[cfg(not(feature = "hdf5"))]
fn hdf5_disabled() -> ExportError {
    ExportError::UnsupportedFormat("hdf5 (built without the `hdf5` feature)".to_string())
}

/// Writes one table to `destination` under `key`. The key names the sheet
/// for Excel and the node for HDF5; CSV ignores it. An existing directory
/// destination resolves to `<dir>/<base_name>.<ext>`.
pub fn export_table(
    destination: &Path,
    table: &DataTable,
    key: &str,
    format: DataFormat,
    settings: &TableExportSettings,
) -> Result<PathBuf, ExportError> {
    let path = resolve_destination(destination, &settings.base_name, format.extension());
    check_overwrite(&path, settings.overwrite)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let sink = open_sink(&path, format, settings)?;
    let written = write_scoped(sink, |sink| sink.write_table(key, table))?;
    log::info!("exported {} rows to {}", table.n_rows(), written.display());
    Ok(written)
}

/// Reads a table previously written by [`export_table`]. With `has_index`
/// the first column becomes the row index.
pub fn read_table(
    path: &Path,
    format: DataFormat,
    key: &str,
    has_index: bool,
) -> Result<DataTable, ExportError> {
    match format {
        DataFormat::Csv => read_csv(path, has_index),
        DataFormat::Xlsx => read_excel(path, &sheet_name_for(key), has_index),
        #[cfg(feature = "hdf5")]
        DataFormat::Hdf5 => self::hdf5_store::read_hdf5(path, key),
        #[cfg(not(feature = "hdf5"))]
        DataFormat::Hdf5 => Err(hdf5_disabled()),
    }
}

/// Builds a table from a header row and string-like rows, splitting off the
/// index column when requested. Shared by the CSV and Excel readers.
pub(crate) fn table_from_rows(
    header: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    has_index: bool,
) -> Result<DataTable, ExportError> {
    let width = header.len();
    let n_rows = rows.len();
    let mut columns: Vec<Vec<CellValue>> = vec![Vec::with_capacity(n_rows); width];
    for row in rows {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().unwrap_or(CellValue::Null));
        }
    }

    let mut names = header.into_iter();
    let mut columns = columns.into_iter();
    let mut table = if has_index && width > 0 {
        let index_name = names.next().filter(|name| !name.is_empty());
        let index = columns.next().unwrap_or_default();
        DataTable::new(index_name, index)
    } else {
        DataTable::with_range_index(n_rows)
    };

    for (name, values) in names.zip(columns) {
        table.add_column(name, values)?;
    }
    Ok(table)
}

/// Type inference for text cells: empty → null, then integer, float, bool,
/// falling back to text.
pub(crate) fn infer_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Null;
    }
    if let Ok(v) = raw.parse::<i64>() {
        return CellValue::Int(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        return CellValue::Float(v);
    }
    match raw {
        "true" | "True" => CellValue::Bool(true),
        "false" | "False" => CellValue::Bool(false),
        _ => CellValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_cell_types() {
        assert_eq!(infer_cell(""), CellValue::Null);
        assert_eq!(infer_cell("12"), CellValue::Int(12));
        assert_eq!(infer_cell("1.5"), CellValue::Float(1.5));
        assert_eq!(infer_cell("2.0"), CellValue::Float(2.0));
        assert_eq!(infer_cell("True"), CellValue::Bool(true));
        assert_eq!(infer_cell("abc"), CellValue::Text("abc".to_string()));
    }

    #[test]
    fn table_from_rows_splits_index() {
        let table = table_from_rows(
            vec!["id".to_string(), "a".to_string()],
            vec![
                vec![CellValue::Int(7), CellValue::Float(0.5)],
                vec![CellValue::Int(8), CellValue::Float(1.5)],
            ],
            true,
        )
        .unwrap();
        assert_eq!(table.index_name.as_deref(), Some("id"));
        assert_eq!(table.index(), [CellValue::Int(7), CellValue::Int(8)]);
        assert_eq!(table.column_names(), vec!["a"]);
    }

    #[test]
    fn table_from_rows_without_index_uses_range() {
        let table = table_from_rows(
            vec!["a".to_string()],
            vec![vec![CellValue::Int(1)], vec![CellValue::Int(2)]],
            false,
        )
        .unwrap();
        assert_eq!(table.index(), [CellValue::Int(0), CellValue::Int(1)]);
    }

    #[derive(Default)]
    struct Calls {
        closed: std::cell::Cell<bool>,
        aborted: std::cell::Cell<bool>,
    }

    struct RecordingSink {
        calls: std::rc::Rc<Calls>,
        fail_on: &'static str,
    }

    impl TableSink for RecordingSink {
        fn write_table(&mut self, key: &str, _table: &DataTable) -> Result<(), ExportError> {
            if key == self.fail_on {
                return Err(ExportError::UnsupportedFormat(key.to_string()));
            }
            Ok(())
        }

        fn close(self: Box<Self>) -> Result<PathBuf, ExportError> {
            self.calls.closed.set(true);
            Ok(PathBuf::from("closed"))
        }

        fn abort(self: Box<Self>) -> Result<(), ExportError> {
            self.calls.aborted.set(true);
            Ok(())
        }
    }

    #[test]
    fn write_scoped_aborts_instead_of_closing_on_error() {
        let calls = std::rc::Rc::new(Calls::default());
        let sink = Box::new(RecordingSink {
            calls: calls.clone(),
            fail_on: "second",
        });
        let result = write_scoped(sink, |sink| {
            sink.write_table("first", &DataTable::default())?;
            sink.write_table("second", &DataTable::default())
        });
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(key)) if key == "second"));
        assert!(calls.aborted.get());
        assert!(!calls.closed.get());
    }

    #[test]
    fn write_scoped_closes_on_success() {
        let calls = std::rc::Rc::new(Calls::default());
        let sink = Box::new(RecordingSink {
            calls: calls.clone(),
            fail_on: "never",
        });
        let written = write_scoped(sink, |sink| sink.write_table("first", &DataTable::default()));
        assert_eq!(written.unwrap(), PathBuf::from("closed"));
        assert!(calls.closed.get());
        assert!(!calls.aborted.get());
    }
}

use super::{infer_cell, remove_partial, table_from_rows, TableSink};
use crate::ExportError;
use plot_model::{CellValue, DataTable};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn csv_field(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        // Debug keeps the fractional part so floats read back as floats
        CellValue::Float(v) => format!("{v:?}"),
        other => other.to_string(),
    }
}

pub(crate) fn write_csv_table(
    path: &Path,
    table: &DataTable,
    include_index: bool,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    let mut header = Vec::with_capacity(table.n_columns() + 1);
    if include_index {
        header.push(table.index_name.clone().unwrap_or_default());
    }
    header.extend(table.column_names().into_iter().map(str::to_string));
    writer.write_record(&header)?;

    for row_idx in 0..table.n_rows() {
        let mut record = Vec::with_capacity(header.len());
        if include_index {
            record.push(csv_field(&table.index()[row_idx]));
        }
        for column in table.columns() {
            record.push(csv_field(&column.values[row_idx]));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_csv(path: &Path, has_index: bool) -> Result<DataTable, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(infer_cell).collect());
    }
    table_from_rows(header, rows, has_index)
}

/// A CSV file holds exactly one table; the key is ignored.
pub struct CsvFileSink {
    path: PathBuf,
    include_index: bool,
    written: bool,
}

impl CsvFileSink {
    pub fn new(path: &Path, include_index: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            include_index,
            written: false,
        }
    }
}

impl TableSink for CsvFileSink {
    fn write_table(&mut self, _key: &str, table: &DataTable) -> Result<(), ExportError> {
        if self.written {
            return Err(ExportError::UnsupportedFormat(
                "csv file holding more than one table".to_string(),
            ));
        }
        write_csv_table(&self.path, table, self.include_index)?;
        self.written = true;
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<PathBuf, ExportError> {
        Ok(self.path)
    }

    fn abort(self: Box<Self>) -> Result<(), ExportError> {
        remove_partial(&self.path)
    }
}

/// Stages one `<key>.csv` per table in a private directory next to the
/// destination. On close a single staged file is moved to the destination;
/// several are bundled into an uncompressed zip archive at the destination.
/// Nothing outside the staging directory is touched before close, and the
/// staging directory is removed on every exit path.
pub struct CsvBundleSink {
    staging: TempDir,
    destination: PathBuf,
    include_index: bool,
    staged: Vec<PathBuf>,
}

impl CsvBundleSink {
    pub fn new(destination: &Path, include_index: bool) -> Result<Self, ExportError> {
        let dir = destination
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix(".plotexport-staging-")
            .tempdir_in(dir)?;
        Ok(Self {
            staging,
            destination: destination.to_path_buf(),
            include_index,
            staged: Vec::new(),
        })
    }

    fn bundle(&self) -> Result<(), ExportError> {
        let file = File::create(&self.destination)?;
        let mut archive = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for staged in &self.staged {
            let name = staged
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("table.csv");
            archive.start_file(name, options)?;
            let mut input = File::open(staged)?;
            std::io::copy(&mut input, &mut archive)?;
        }
        archive.finish()?;
        Ok(())
    }
}

impl TableSink for CsvBundleSink {
    fn write_table(&mut self, key: &str, table: &DataTable) -> Result<(), ExportError> {
        let path = self.staging.path().join(format!("{key}.csv"));
        write_csv_table(&path, table, self.include_index)?;
        log::debug!("staged table '{key}' at {}", path.display());
        self.staged.push(path);
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<PathBuf, ExportError> {
        match self.staged.as_slice() {
            [single] => std::fs::rename(single, &self.destination)?,
            _ => {
                if let Err(err) = self.bundle() {
                    if let Err(cleanup) = remove_partial(&self.destination) {
                        log::warn!("failed to remove partial archive: {cleanup}");
                    }
                    return Err(err);
                }
            }
        }
        let CsvBundleSink {
            staging,
            destination,
            ..
        } = *self;
        staging.close()?;
        Ok(destination)
    }

    fn abort(self: Box<Self>) -> Result<(), ExportError> {
        log::debug!(
            "discarding {} staged tables for {}",
            self.staged.len(),
            self.destination.display()
        );
        self.staging.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::write_scoped;

    fn small_table() -> DataTable {
        let mut table = DataTable::with_range_index(2);
        table
            .add_column("a", vec![1i64.into(), 2i64.into()])
            .unwrap();
        table
    }

    #[test]
    fn failed_bundle_publishes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let destination = dir.path().join("bundle.zip");
        let sink = Box::new(CsvBundleSink::new(&destination, true).unwrap());

        let result = write_scoped(sink, |sink| {
            sink.write_table("dataset_source", &small_table())?;
            Err(ExportError::UnsupportedFormat("second table".to_string()))
        });

        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
        assert!(!destination.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn staged_names_never_collide_with_neighbours() {
        let dir = tempfile::tempdir().expect("tempdir");
        let neighbour = dir.path().join("dataset_source.csv");
        std::fs::write(&neighbour, "keep me\n").unwrap();
        let destination = dir.path().join("bundle.zip");

        let sink = Box::new(CsvBundleSink::new(&destination, true).unwrap());
        let written = write_scoped(sink, |sink| {
            sink.write_table("dataset_source", &small_table())?;
            sink.write_table("0_plot_data", &small_table())
        })
        .unwrap();

        assert_eq!(written, destination);
        assert_eq!(std::fs::read_to_string(&neighbour).unwrap(), "keep me\n");
        let mut names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["bundle.zip", "dataset_source.csv"]);
    }
}

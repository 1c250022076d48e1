//! HDF5 layout: one group per table key holding one dataset per column plus
//! `_columns` (column order), `_index` and `_index_name` datasets.

use super::{remove_partial, TableSink};
use crate::ExportError;
use hdf5::types::{TypeDescriptor, VarLenUnicode};
use hdf5::{Dataset, File, Group};
use plot_model::{CellValue, DataTable};
use std::path::{Path, PathBuf};

const COLUMNS_DATASET: &str = "_columns";
const INDEX_DATASET: &str = "_index";
const INDEX_NAME_DATASET: &str = "_index_name";

enum Stored {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Text(Vec<VarLenUnicode>),
}

fn unicode(value: &str) -> Result<VarLenUnicode, ExportError> {
    value
        .parse::<VarLenUnicode>()
        .map_err(|e| ExportError::Hdf5(format!("cannot store '{value}': {e}")))
}

/// Picks the narrowest homogeneous storage for a column. Nulls force
/// numeric columns to floats (NaN) and other columns to text.
fn stored_values(values: &[CellValue]) -> Result<Stored, ExportError> {
    let all = |pred: fn(&CellValue) -> bool| values.iter().all(pred);
    if all(|v| matches!(v, CellValue::Bool(_))) && !values.is_empty() {
        return Ok(Stored::Bool(
            values
                .iter()
                .map(|v| matches!(v, CellValue::Bool(true)))
                .collect(),
        ));
    }
    if all(|v| matches!(v, CellValue::Int(_))) {
        return Ok(Stored::Int(
            values
                .iter()
                .map(|v| if let CellValue::Int(i) = v { *i } else { 0 })
                .collect(),
        ));
    }
    if all(|v| matches!(v, CellValue::Int(_) | CellValue::Float(_) | CellValue::Null)) {
        return Ok(Stored::Float(
            values
                .iter()
                .map(|v| v.as_f64().unwrap_or(f64::NAN))
                .collect(),
        ));
    }
    let text = values
        .iter()
        .map(|v| unicode(&v.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Stored::Text(text))
}

fn write_dataset(
    group: &Group,
    name: &str,
    values: &[CellValue],
    compression_level: u8,
) -> Result<(), ExportError> {
    let compress = compression_level > 0 && !values.is_empty();
    macro_rules! create {
        ($data:expr) => {{
            let builder = group.new_dataset_builder();
            let builder = if compress {
                builder.deflate(compression_level)
            } else {
                builder
            };
            builder.with_data($data.as_slice()).create(name)?;
        }};
    }
    match stored_values(values)? {
        Stored::Bool(data) => create!(data),
        Stored::Int(data) => create!(data),
        Stored::Float(data) => create!(data),
        Stored::Text(data) => create!(data),
    }
    Ok(())
}

pub struct Hdf5Sink {
    path: PathBuf,
    file: File,
    compression_level: u8,
}

impl Hdf5Sink {
    pub fn create(path: &Path, compression_level: u8) -> Result<Self, ExportError> {
        Ok(Self {
            path: path.to_path_buf(),
            file: File::create(path)?,
            compression_level,
        })
    }
}

impl TableSink for Hdf5Sink {
    fn write_table(&mut self, key: &str, table: &DataTable) -> Result<(), ExportError> {
        let group = self.file.create_group(key)?;
        let names = table
            .column_names()
            .into_iter()
            .map(unicode)
            .collect::<Result<Vec<_>, _>>()?;
        group
            .new_dataset_builder()
            .with_data(names.as_slice())
            .create(COLUMNS_DATASET)?;
        let index_name = vec![unicode(table.index_name.as_deref().unwrap_or(""))?];
        group
            .new_dataset_builder()
            .with_data(index_name.as_slice())
            .create(INDEX_NAME_DATASET)?;
        write_dataset(&group, INDEX_DATASET, table.index(), self.compression_level)?;
        for column in table.columns() {
            write_dataset(&group, &column.name, &column.values, self.compression_level)?;
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<PathBuf, ExportError> {
        let Hdf5Sink { path, file, .. } = *self;
        file.flush()?;
        file.close()?;
        Ok(path)
    }

    fn abort(self: Box<Self>) -> Result<(), ExportError> {
        let Hdf5Sink { path, file, .. } = *self;
        file.close()?;
        remove_partial(&path)
    }
}

fn read_values(dataset: &Dataset) -> Result<Vec<CellValue>, ExportError> {
    let values = match dataset.dtype()?.to_descriptor()? {
        TypeDescriptor::Boolean => dataset
            .read_raw::<bool>()?
            .into_iter()
            .map(CellValue::Bool)
            .collect(),
        TypeDescriptor::Integer(_) | TypeDescriptor::Unsigned(_) => dataset
            .read_raw::<i64>()?
            .into_iter()
            .map(CellValue::Int)
            .collect(),
        TypeDescriptor::Float(_) => dataset
            .read_raw::<f64>()?
            .into_iter()
            .map(|v| if v.is_nan() { CellValue::Null } else { CellValue::Float(v) })
            .collect(),
        TypeDescriptor::VarLenUnicode => dataset
            .read_raw::<VarLenUnicode>()?
            .into_iter()
            .map(|v| CellValue::Text(v.as_str().to_string()))
            .collect(),
        other => {
            return Err(ExportError::Hdf5(format!(
                "unsupported dataset type {other:?} in {}",
                dataset.name()
            )))
        }
    };
    Ok(values)
}

pub fn read_hdf5(path: &Path, key: &str) -> Result<DataTable, ExportError> {
    let file = File::open(path)?;
    let group = file.group(key)?;
    let names: Vec<String> = group
        .dataset(COLUMNS_DATASET)?
        .read_raw::<VarLenUnicode>()?
        .into_iter()
        .map(|v| v.as_str().to_string())
        .collect();
    let index_name = group
        .dataset(INDEX_NAME_DATASET)?
        .read_raw::<VarLenUnicode>()?
        .into_iter()
        .next()
        .map(|v| v.as_str().to_string())
        .filter(|name| !name.is_empty());
    let index = read_values(&group.dataset(INDEX_DATASET)?)?;

    let mut table = DataTable::new(index_name, index);
    for name in names {
        let values = read_values(&group.dataset(&name)?)?;
        table.add_column(name, values)?;
    }
    Ok(table)
}

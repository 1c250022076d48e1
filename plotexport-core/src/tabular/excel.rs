use super::{remove_partial, table_from_rows, TableSink};
use crate::ExportError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use plot_model::{CellValue, DataTable};
use simple_excel_writer::{Row, Workbook};
use std::path::{Path, PathBuf};

const MAX_SHEET_NAME_LEN: usize = 31;
const ILLEGAL_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Sheet name for a table key, within Excel's naming rules.
pub fn sheet_name_for(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| if ILLEGAL_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

fn add_cell(row: &mut Row, value: &CellValue) {
    match value {
        CellValue::Null => row.add_empty_cells(1),
        CellValue::Bool(v) => row.add_cell(*v),
        CellValue::Int(v) => row.add_cell(*v as f64),
        CellValue::Float(v) => row.add_cell(*v),
        CellValue::Text(v) => row.add_cell(v.as_str()),
    }
}

/// Workbook with one sheet per written table. The file is only complete
/// once the sink is closed.
pub struct ExcelSink {
    path: PathBuf,
    workbook: Workbook,
    include_index: bool,
}

impl ExcelSink {
    pub fn create(path: &Path, include_index: bool) -> Result<Self, ExportError> {
        let path_str = path.to_str().ok_or_else(|| {
            ExportError::Excel(format!("path is not valid UTF-8: {}", path.display()))
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook: Workbook::create(path_str),
            include_index,
        })
    }
}

impl TableSink for ExcelSink {
    fn write_table(&mut self, key: &str, table: &DataTable) -> Result<(), ExportError> {
        let name = sheet_name_for(key);
        let mut sheet = self.workbook.create_sheet(&name);
        let include_index = self.include_index;

        self.workbook
            .write_sheet(&mut sheet, |sheet_writer| {
                let mut header = Row::new();
                if include_index {
                    header.add_cell(table.index_name.clone().unwrap_or_default());
                }
                for column in table.column_names() {
                    header.add_cell(column);
                }
                sheet_writer.append_row(header)?;

                for row_idx in 0..table.n_rows() {
                    let mut row = Row::new();
                    if include_index {
                        add_cell(&mut row, &table.index()[row_idx]);
                    }
                    for column in table.columns() {
                        add_cell(&mut row, &column.values[row_idx]);
                    }
                    sheet_writer.append_row(row)?;
                }
                Ok(())
            })
            .map_err(|e| ExportError::Excel(format!("failed to write sheet '{name}': {e}")))
    }

    fn close(mut self: Box<Self>) -> Result<PathBuf, ExportError> {
        self.workbook.close().map_err(|e| {
            ExportError::Excel(format!(
                "could not save workbook {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(self.path)
    }

    fn abort(mut self: Box<Self>) -> Result<(), ExportError> {
        if let Err(err) = self.workbook.close() {
            log::debug!("discarding unsaved workbook {}: {err}", self.path.display());
        }
        remove_partial(&self.path)
    }
}

fn cell_from_excel(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Bool(v) => CellValue::Bool(*v),
        Data::Int(v) => CellValue::Int(*v),
        // Excel stores every number as a double
        Data::Float(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
            CellValue::Int(*v as i64)
        }
        Data::Float(v) => CellValue::Float(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

pub fn read_excel(path: &Path, sheet: &str, has_index: bool) -> Result<DataTable, ExportError> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| ExportError::Excel(format!("could not open {}: {e}", path.display())))?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| ExportError::Excel(format!("could not read sheet '{sheet}': {e}")))?;

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect(),
        None => return Ok(DataTable::default()),
    };
    let body = rows
        .map(|cells| cells.iter().map(cell_from_excel).collect())
        .collect();
    table_from_rows(header, body, has_index)
}

use crate::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Label used for the index of a table whose index has no name.
pub const DEFAULT_INDEX_LABEL: &str = "index";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Bool(v) => Value::from(*v),
            CellValue::Int(v) => Value::from(*v),
            // NaN and infinities have no JSON representation
            CellValue::Float(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Text(v) => Value::from(v.as_str()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(v) => write!(f, "{v}"),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

/// Two-dimensional labeled table: ordered named columns sharing one row index.
/// Every column holds exactly one value per index entry and column names are
/// unique; deserialization enforces the same rules as [`DataTable::add_column`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataTable")]
pub struct DataTable {
    #[serde(default)]
    pub index_name: Option<String>,
    index: Vec<CellValue>,
    columns: Vec<Column>,
}

#[derive(Deserialize)]
struct RawDataTable {
    #[serde(default)]
    index_name: Option<String>,
    index: Vec<CellValue>,
    #[serde(default)]
    columns: Vec<Column>,
}

impl TryFrom<RawDataTable> for DataTable {
    type Error = ModelError;

    fn try_from(raw: RawDataTable) -> Result<Self, Self::Error> {
        let mut table = DataTable::new(raw.index_name, raw.index);
        for column in raw.columns {
            table.add_column(column.name, column.values)?;
        }
        Ok(table)
    }
}

impl DataTable {
    pub fn new(index_name: Option<String>, index: Vec<CellValue>) -> Self {
        Self {
            index_name,
            index,
            columns: Vec::new(),
        }
    }

    /// Unnamed `0..rows` index, the default for freshly loaded data.
    pub fn with_range_index(rows: usize) -> Self {
        Self::new(None, (0..rows as i64).map(CellValue::Int).collect())
    }

    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<CellValue>,
    ) -> Result<(), ModelError> {
        let name = name.into();
        if self.columns.iter().any(|col| col.name == name) {
            return Err(ModelError::DuplicateColumn(name));
        }
        if values.len() != self.index.len() {
            return Err(ModelError::LengthMismatch {
                column: name,
                expected: self.index.len(),
                found: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    pub fn index(&self) -> &[CellValue] {
        &self.index
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column, ModelError> {
        self.columns
            .iter()
            .find(|col| col.name == name)
            .ok_or_else(|| ModelError::MissingColumn(name.to_string()))
    }

    pub fn index_label(&self) -> &str {
        self.index_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_INDEX_LABEL)
    }

    /// New table restricted to `names`, in the order given, sharing this table's index.
    pub fn select(&self, names: &[&str]) -> Result<DataTable, ModelError> {
        let mut selected = DataTable::new(self.index_name.clone(), self.index.clone());
        for name in names {
            if selected.columns.iter().any(|col| col.name == *name) {
                continue;
            }
            let column = self.column(name)?;
            selected.columns.push(column.clone());
        }
        Ok(selected)
    }

    /// Row-major records: one JSON object per row, in index order. The index
    /// value is stored under [`DataTable::index_label`] and columns follow in
    /// table order.
    pub fn records(&self) -> Vec<Value> {
        let label = self.index_label();
        (0..self.n_rows())
            .map(|row_idx| {
                let mut record = Map::new();
                record.insert(label.to_string(), self.index[row_idx].to_json());
                for col in &self.columns {
                    record.insert(col.name.clone(), col.values[row_idx].to_json());
                }
                Value::Object(record)
            })
            .collect()
    }
}

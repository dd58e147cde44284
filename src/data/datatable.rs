use crate::filter::FilterType;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Default column width in terminal cells when nothing better is known
pub const DEFAULT_COL_WIDTH: u16 = 15;
pub const MIN_COL_WIDTH: u16 = 4;
pub const MAX_COL_WIDTH: u16 = 60;

/// Represents the data type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Duration,
    Null,
    Mixed, // For columns with mixed types
}

impl DataType {
    /// Infer type from a string value
    pub fn infer_from_string(value: &str) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case("null") {
            return DataType::Null;
        }

        if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            return DataType::Boolean;
        }

        if value.parse::<i64>().is_ok() {
            return DataType::Integer;
        }

        if value.parse::<f64>().is_ok() {
            return DataType::Float;
        }

        // Bare numbers were already claimed above, so only suffixed forms land here
        if crate::filter::parse_duration_secs(value).is_some() {
            return DataType::Duration;
        }

        if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
            return DataType::Date;
        }

        if parse_datetime(value).is_some() {
            return DataType::DateTime;
        }

        DataType::String
    }

    /// Merge two types (for columns with mixed values)
    pub fn merge(&self, other: &DataType) -> DataType {
        if self == other {
            return *self;
        }

        match (self, other) {
            (DataType::Null, t) | (t, DataType::Null) => *t,
            (DataType::Integer, DataType::Float) | (DataType::Float, DataType::Integer) => {
                DataType::Float
            }
            (DataType::Date, DataType::DateTime) | (DataType::DateTime, DataType::Date) => {
                DataType::DateTime
            }
            _ => DataType::Mixed,
        }
    }

    /// The filter type used to pick operator sets and editors for the column
    pub fn filter_type(&self) -> FilterType {
        match self {
            DataType::String => FilterType::String,
            DataType::Integer | DataType::Float => FilterType::Number,
            DataType::Boolean => FilterType::Boolean,
            DataType::Date => FilterType::Date,
            DataType::DateTime => FilterType::DateTime,
            DataType::Duration => FilterType::Duration,
            DataType::Null | DataType::Mixed => FilterType::Unknown,
        }
    }
}

/// Parse a datetime in the handful of formats the loaders emit
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Column metadata and definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataColumn {
    pub name: String,
    /// Display label shown in the header row; defaults to the name
    pub header: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub null_count: usize,
    /// Whether the column offers a filter editor
    pub filterable: bool,
    /// Declared width and its clamp range, in terminal cells
    pub size: u16,
    pub min_size: u16,
    pub max_size: u16,
}

impl DataColumn {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            header: name.clone(),
            name,
            data_type: DataType::String,
            nullable: true,
            null_count: 0,
            filterable: true,
            size: DEFAULT_COL_WIDTH,
            min_size: MIN_COL_WIDTH,
            max_size: MAX_COL_WIDTH,
        }
    }

    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Set the declared width; the value is clamped into the min/max range
    pub fn with_size(mut self, size: u16) -> Self {
        self.size = size.clamp(self.min_size, self.max_size);
        self
    }

    /// Set the clamp range, re-clamping the declared width to stay inside it
    pub fn with_size_bounds(mut self, min_size: u16, max_size: u16) -> Self {
        self.min_size = min_size;
        self.max_size = max_size.max(min_size);
        self.size = self.size.clamp(self.min_size, self.max_size);
        self
    }

    /// Clamp an arbitrary width into this column's range
    pub fn clamp_width(&self, width: u16) -> u16 {
        width.clamp(self.min_size, self.max_size)
    }

    pub fn filter_type(&self) -> FilterType {
        self.data_type.filter_type()
    }
}

/// A single cell value in the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Elapsed time in fractional seconds
    Duration(f64),
    Null,
}

impl DataValue {
    pub fn from_string(s: &str, data_type: &DataType) -> Self {
        if s.is_empty() || s.eq_ignore_ascii_case("null") {
            return DataValue::Null;
        }

        match data_type {
            DataType::String => DataValue::String(s.to_string()),
            DataType::Integer => s
                .parse::<i64>()
                .map(DataValue::Integer)
                .unwrap_or_else(|_| DataValue::String(s.to_string())),
            DataType::Float => s
                .parse::<f64>()
                .map(DataValue::Float)
                .unwrap_or_else(|_| DataValue::String(s.to_string())),
            DataType::Boolean => {
                let lower = s.to_lowercase();
                DataValue::Boolean(lower == "true" || lower == "1" || lower == "yes")
            }
            DataType::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(DataValue::Date)
                .unwrap_or_else(|_| DataValue::String(s.to_string())),
            DataType::DateTime => parse_datetime(s)
                .map(DataValue::DateTime)
                .unwrap_or_else(|| DataValue::String(s.to_string())),
            DataType::Duration => crate::filter::parse_duration_secs(s)
                .map(DataValue::Duration)
                .unwrap_or_else(|| DataValue::String(s.to_string())),
            DataType::Null => DataValue::Null,
            DataType::Mixed => {
                let inferred = DataType::infer_from_string(s);
                Self::from_string(s, &inferred)
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::String(_) => DataType::String,
            DataValue::Integer(_) => DataType::Integer,
            DataValue::Float(_) => DataType::Float,
            DataValue::Boolean(_) => DataType::Boolean,
            DataValue::Date(_) => DataType::Date,
            DataValue::DateTime(_) => DataType::DateTime,
            DataValue::Duration(_) => DataType::Duration,
            DataValue::Null => DataType::Null,
        }
    }

    /// Numeric view of the value, when one exists
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Integer(i) => Some(*i as f64),
            DataValue::Float(f) => Some(*f),
            DataValue::Duration(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DataValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            DataValue::Duration(secs) => write!(f, "{}s", secs),
            DataValue::Null => write!(f, ""),
        }
    }
}

/// A row of data with a stable identity
///
/// The id survives refetches and reorderings; it keys selection, focus,
/// and virtualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataRow {
    pub id: String,
    pub values: Vec<DataValue>,
}

impl DataRow {
    pub fn new(id: impl Into<String>, values: Vec<DataValue>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    pub fn get(&self, index: usize) -> Option<&DataValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The main DataTable structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<DataColumn>,
    pub rows: Vec<DataRow>,
    pub metadata: HashMap<String, String>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn add_column(&mut self, column: DataColumn) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn add_row(&mut self, row: DataRow) -> Result<(), String> {
        if row.len() != self.columns.len() {
            return Err(format!(
                "Row has {} values but table has {} columns",
                row.len(),
                self.columns.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn get_column(&self, name: &str) -> Option<&DataColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn get_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Get a value at specific row and column
    pub fn get_value(&self, row: usize, col: usize) -> Option<&DataValue> {
        self.rows.get(row)?.get(col)
    }

    /// Get a value by row index and column name
    pub fn get_value_by_name(&self, row: usize, col_name: &str) -> Option<&DataValue> {
        let col_idx = self.get_column_index(col_name)?;
        self.get_value(row, col_idx)
    }

    pub fn row_index_of_id(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    /// Infer and update column types based on data
    pub fn infer_column_types(&mut self) {
        for (col_idx, column) in self.columns.iter_mut().enumerate() {
            let mut inferred_type = DataType::Null;
            let mut null_count = 0;

            for row in &self.rows {
                if let Some(value) = row.get(col_idx) {
                    if value.is_null() {
                        null_count += 1;
                    } else {
                        inferred_type = inferred_type.merge(&value.data_type());
                    }
                }
            }

            column.data_type = inferred_type;
            column.null_count = null_count;
            column.nullable = null_count > 0;
        }
    }
}

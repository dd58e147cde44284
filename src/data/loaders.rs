use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::data::datatable::{DataColumn, DataRow, DataTable, DataType, DataValue};

/// Load a JSON array of flat objects into a DataTable
///
/// Columns come from the first object's keys; rows missing a key get a
/// null cell. Row identity prefers an `id` field, else the ordinal.
pub fn load_json_to_datatable(path: impl AsRef<Path>, table_name: &str) -> Result<DataTable> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let json: JsonValue =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let records = json
        .as_array()
        .ok_or_else(|| anyhow!("{} is not a JSON array", path.display()))?;

    let mut table = DataTable::new(table_name);
    table
        .metadata
        .insert("source".to_string(), path.display().to_string());

    let Some(first) = records.first() else {
        return Ok(table);
    };
    let first = first
        .as_object()
        .ok_or_else(|| anyhow!("{} rows must be objects", path.display()))?;

    for key in first.keys() {
        table.add_column(DataColumn::new(key.clone()));
    }

    for (ordinal, record) in records.iter().enumerate() {
        let Some(object) = record.as_object() else {
            warn!(ordinal, "skipping non-object row");
            continue;
        };

        let id = object
            .get("id")
            .map(json_to_id)
            .unwrap_or_else(|| ordinal.to_string());

        let values: Vec<DataValue> = table
            .columns
            .iter()
            .map(|column| {
                object
                    .get(&column.name)
                    .map(json_value_to_data_value)
                    .unwrap_or(DataValue::Null)
            })
            .collect();

        table
            .add_row(DataRow::new(id, values))
            .map_err(|e| anyhow!(e))?;
    }

    table.infer_column_types();
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        path = %path.display(),
        "loaded json table"
    );
    Ok(table)
}

/// Load a CSV file with a header row, inferring column types in a second
/// pass over the raw strings
pub fn load_csv_to_datatable(path: impl AsRef<Path>, table_name: &str) -> Result<DataTable> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        raw_rows.push(record.iter().map(str::to_string).collect());
    }

    // First pass: merge an inferred type per column across every cell
    let mut types = vec![DataType::Null; headers.len()];
    for row in &raw_rows {
        for (i, cell) in row.iter().enumerate() {
            if i < types.len() {
                types[i] = types[i].merge(&DataType::infer_from_string(cell));
            }
        }
    }

    let mut table = DataTable::new(table_name);
    table
        .metadata
        .insert("source".to_string(), path.display().to_string());
    let id_column = headers.iter().position(|h| h == "id");
    for (name, data_type) in headers.iter().zip(&types) {
        table.add_column(DataColumn::new(name.clone()).with_type(*data_type));
    }

    for (ordinal, raw) in raw_rows.iter().enumerate() {
        let id = id_column
            .and_then(|i| raw.get(i))
            .filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| ordinal.to_string());

        let values: Vec<DataValue> = types
            .iter()
            .enumerate()
            .map(|(i, data_type)| {
                raw.get(i)
                    .map(|cell| DataValue::from_string(cell, data_type))
                    .unwrap_or(DataValue::Null)
            })
            .collect();

        table
            .add_row(DataRow::new(id, values))
            .map_err(|e| anyhow!(e))?;
    }

    table.infer_column_types();
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        path = %path.display(),
        "loaded csv table"
    );
    Ok(table)
}

fn json_to_id(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_value_to_data_value(json: &JsonValue) -> DataValue {
    match json {
        JsonValue::Null => DataValue::Null,
        JsonValue::Bool(b) => DataValue::Boolean(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                DataValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                DataValue::Float(f)
            } else {
                DataValue::String(n.to_string())
            }
        }
        JsonValue::String(s) => {
            // Recognize the typed string shapes the backend emits
            match DataType::infer_from_string(s) {
                DataType::Date | DataType::DateTime | DataType::Duration => {
                    DataValue::from_string(s, &DataType::infer_from_string(s))
                }
                _ => DataValue::String(s.clone()),
            }
        }
        // Nested structures render as their JSON text
        JsonValue::Array(_) | JsonValue::Object(_) => DataValue::String(json.to_string()),
    }
}

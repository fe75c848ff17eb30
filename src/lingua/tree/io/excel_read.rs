use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use serde_json::{Number, Value};
use tracing::debug;

use crate::lingua::tree::error::{Result, ToolError};
use crate::lingua::tree::model::{
    DEUTSCH_COLUMN, ENGLISH_COLUMN, SkippedSheet, TranslationRow, TranslationSheet,
};

/// A worksheet as read from the workbook: the header row plus every
/// non-blank data row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<DataType>>,
}

impl RawSheet {
    /// Interprets the sheet as translations: the first column is the key,
    /// the `english` and `deutsch` columns carry the texts.
    ///
    /// Sheets lacking either language column are rejected as a whole.
    pub fn into_translations(self) -> std::result::Result<TranslationSheet, SkippedSheet> {
        let english = column_index(&self.headers, ENGLISH_COLUMN);
        let deutsch = column_index(&self.headers, DEUTSCH_COLUMN);

        let (english, deutsch) = match (english, deutsch) {
            (Some(english), Some(deutsch)) => (english, deutsch),
            _ => {
                let missing_columns = [(ENGLISH_COLUMN, english), (DEUTSCH_COLUMN, deutsch)]
                    .into_iter()
                    .filter(|(_, index)| index.is_none())
                    .map(|(column, _)| column.to_string())
                    .collect();
                return Err(SkippedSheet {
                    name: self.name,
                    missing_columns,
                });
            }
        };

        let rows = self
            .rows
            .iter()
            .map(|row| TranslationRow {
                key: cell_to_string(row.first()),
                english: cell_to_value(row.get(english)),
                deutsch: cell_to_value(row.get(deutsch)),
            })
            .collect();

        Ok(TranslationSheet {
            name: self.name,
            rows,
        })
    }
}

/// Reads every worksheet of the workbook at `path`, in workbook order.
///
/// Any format `calamine` recognises from the extension is accepted
/// (`.xlsx`, `.xlsm`, `.xls`, `.ods`).
pub fn read_sheets(path: &Path) -> Result<Vec<RawSheet>> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_owned();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))??;
        let sheet = raw_sheet(name, &range);
        debug!(
            sheet = %sheet.name,
            columns = sheet.headers.len(),
            rows = sheet.rows.len(),
            "sheet loaded"
        );
        sheets.push(sheet);
    }

    Ok(sheets)
}

fn raw_sheet(name: String, range: &Range<DataType>) -> RawSheet {
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };

    let rows = rows
        .filter(|row| !row.iter().all(|cell| matches!(cell, DataType::Empty)))
        .map(|row| row.to_vec())
        .collect();

    RawSheet {
        name,
        headers,
        rows,
    }
}

fn column_index(headers: &[String], column: &str) -> Option<usize> {
    headers.iter().position(|header| header == column)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => float_to_string(*value),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(cell @ (DataType::DateTime(_) | DataType::Duration(_))) => temporal_text(cell),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn cell_to_value(cell: Option<&DataType>) -> Value {
    match cell {
        Some(DataType::String(value)) => Value::String(value.clone()),
        Some(DataType::Int(value)) => Value::from(*value),
        Some(DataType::Float(value)) => float_to_value(*value),
        Some(DataType::Bool(value)) => Value::Bool(*value),
        Some(cell @ (DataType::DateTime(_) | DataType::Duration(_))) => {
            Value::String(temporal_text(cell))
        }
        Some(DataType::Empty) | None => Value::Null,
        Some(other) => Value::String(other.to_string()),
    }
}

/// Renders date cells as ISO 8601 (`2024-01-01T00:00:00`) and duration cells
/// as `[-]H:MM:SS`. Cells outside chrono's range keep their serial number.
fn temporal_text(cell: &DataType) -> String {
    let rendered = match cell {
        DataType::DateTime(_) => cell
            .as_datetime()
            .map(|datetime| datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
        DataType::Duration(_) => cell.as_duration().map(|duration| {
            let seconds = duration.num_seconds();
            let sign = if seconds < 0 { "-" } else { "" };
            let seconds = seconds.unsigned_abs();
            format!(
                "{sign}{}:{:02}:{:02}",
                seconds / 3600,
                seconds % 3600 / 60,
                seconds % 60
            )
        }),
        _ => None,
    };
    rendered.unwrap_or_else(|| cell.to_string())
}

// Spreadsheets store every number as a float; whole numbers read back as
// integers.
fn float_to_value(value: f64) -> Value {
    if let Some(integer) = whole_number(value) {
        return Value::from(integer);
    }
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

fn float_to_string(value: f64) -> String {
    match whole_number(value) {
        Some(integer) => integer.to_string(),
        None => value.to_string(),
    }
}

fn whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

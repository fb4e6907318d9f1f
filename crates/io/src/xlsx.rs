// Excel import (xlsx, xls, xlsb, ods)

use std::path::Path;

use assaymatch_align::model::Table;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader, Sheets};
use chrono::Timelike;

use crate::error::IoError;
use crate::header_names;

/// Read one worksheet as a table. The first row of the used range is the
/// header. Without a sheet name the first sheet in the workbook is read.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| IoError::read(path, format!("failed to open Excel file: {e}")))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| IoError::UnknownSheet {
                path: path.to_path_buf(),
                sheet: wanted.to_string(),
                available: sheet_names.clone(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IoError::parse(path, "Excel file contains no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| IoError::parse(path, format!("failed to read sheet '{name}': {e}")))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| IoError::parse(path, format!("sheet '{name}' is empty (no header row)")))?;
    let header_text: Vec<String> = header.iter().map(|c| cell_text(c).unwrap_or_default()).collect();
    let mut table = Table::new(header_names(header_text.iter().map(|s| s.as_str())));

    for row in rows {
        let cells: Vec<Option<String>> = row.iter().map(cell_text).collect();
        if cells.iter().all(|c| c.is_none()) {
            continue;
        }
        table.push_row(cells);
    }

    log::debug!(
        "read {} rows x {} columns from sheet '{}' of {}",
        table.len(),
        table.columns.len(),
        name,
        path.display()
    );
    Ok(table)
}

/// ISO 8601 date, with the time only when it is not midnight. Durations and
/// serials outside chrono's range keep the raw serial number.
fn datetime_text(dt: &ExcelDateTime) -> String {
    match dt.as_datetime().filter(|_| dt.is_datetime()) {
        Some(t) if t.num_seconds_from_midnight() == 0 => t.format("%Y-%m-%d").to_string(),
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(n) => {
            // Format nicely: integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Some(format!("{}", *n as i64))
            } else {
                Some(format!("{}", n))
            }
        }
        Data::Int(n) => Some(n.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Some(format!("#{:?}", e)),
        Data::DateTime(dt) => Some(datetime_text(dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

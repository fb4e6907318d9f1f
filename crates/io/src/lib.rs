//! Table loading and result writing for assaymatch.
//!
//! Delimited text goes through `csv` with delimiter sniffing and a
//! Windows-1252 fallback; spreadsheets go through calamine. Every loader
//! returns an `assaymatch_align::Table` with cleaned headers.

pub mod csv;
pub mod error;
pub mod xlsx;

use std::collections::HashMap;
use std::path::Path;

use assaymatch_align::model::{MatchDecision, Table};

pub use error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    Excel,
}

impl TableFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Tsv => "tsv",
            TableFormat::Excel => "excel",
        }
    }
}

/// Infer a table format from the file extension. Anything unrecognized is
/// read as delimited text.
pub fn infer_format(path: &Path) -> TableFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("xlsb") | Some("ods") => TableFormat::Excel,
        Some("tsv") | Some("tab") => TableFormat::Tsv,
        _ => TableFormat::Csv,
    }
}

/// Load a table and clean its headers. `sheet` only applies to Excel files.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let format = infer_format(path);
    if sheet.is_some() && format != TableFormat::Excel {
        log::warn!("ignoring sheet name for non-Excel file {}", path.display());
    }

    let mut table = match format {
        TableFormat::Excel => xlsx::import(path, sheet)?,
        TableFormat::Tsv => csv::import_tsv(path)?,
        TableFormat::Csv => csv::import(path)?,
    };
    table.normalize_headers();

    log::info!(
        "loaded {} ({}): {} rows, {} columns",
        path.display(),
        format.as_str(),
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

/// Write a table as comma-separated text.
pub fn write_csv(table: &Table, path: &Path) -> Result<(), IoError> {
    csv::export(table, path)?;
    log::debug!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Write the per-row match audit log.
pub fn write_decisions_csv(decisions: &[MatchDecision], path: &Path) -> Result<(), IoError> {
    csv::export_decisions(decisions, path)?;
    log::debug!("wrote {} decisions to {}", decisions.len(), path.display());
    Ok(())
}

/// Header names for a raw header record: blank names become `Unnamed: {i}`
/// and repeated names get `.1`, `.2`, ... suffixes so every column stays
/// addressable.
pub(crate) fn header_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.enumerate()
        .map(|(i, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                name.to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let out = if *count == 0 { base } else { format!("{base}.{count}") };
            *count += 1;
            out
        })
        .collect()
}

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{AlignError, Dataset};
use crate::normalize::normalize_header;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One record, positioned by its table's column list. `None` is a null cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<Option<String>>,
}

impl Row {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    pub fn get(&self, col: usize) -> Option<&str> {
        self.cells.get(col).and_then(|c| c.as_deref())
    }
}

/// A pre-loaded table: ordered header plus rows. Columns are opaque to the
/// engine except for the designated key column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut cells: Vec<Option<String>>) {
        cells.resize(self.columns.len(), None);
        self.rows.push(Row { cells });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact-name column lookup. First occurrence wins on duplicate headers.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Resolve a key column or fail with the list of available columns.
    pub fn require_column(&self, name: &str, dataset: Dataset) -> Result<usize, AlignError> {
        self.column_index(name).ok_or_else(|| AlignError::MissingColumn {
            dataset,
            column: name.to_string(),
            available: self.columns.clone(),
        })
    }

    /// Strip invisible characters from header names. Applied once per table
    /// at load time, never per cell.
    pub fn normalize_headers(&mut self) {
        for col in &mut self.columns {
            *col = normalize_header(col);
        }
    }

    /// Cell value by column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)
    }
}

/// Serializes as an array of `{column: value}` objects in header order.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct RowView<'a> {
            columns: &'a [String],
            row: &'a Row,
        }

        impl Serialize for RowView<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.columns.len()))?;
                for (i, col) in self.columns.iter().enumerate() {
                    map.serialize_entry(col, &self.row.get(i))?;
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowView {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// Audit record for one reference row. `matched == None` is the
/// absence-marker: nothing met the threshold, or the pool was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDecision {
    pub query: String,
    pub matched: Option<String>,
    pub score: u8,
}

impl MatchDecision {
    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }
}

/// Audit table headers, in column order.
pub const DECISION_COLUMNS: [&str; 3] = [
    "File2 Assay Description (clean)",
    "Matched File1 Assay (clean)",
    "Match Score",
];

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignSummary {
    pub reference_rows: usize,
    pub candidate_pool: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Accepted decisions that scored 100.
    pub exact: usize,
    /// Mean score over accepted decisions.
    pub mean_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlignMeta {
    pub engine_version: String,
    pub scorer: String,
    pub threshold: u8,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlignResult {
    pub meta: AlignMeta,
    pub summary: AlignSummary,
    pub aligned: Table,
    pub decisions: Vec<MatchDecision>,
}

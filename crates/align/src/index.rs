use std::collections::HashMap;

use crate::error::{AlignError, Dataset};
use crate::model::{Row, Table};
use crate::normalize::normalize_text;

/// Curated rows addressed by normalized key text.
///
/// Built once per run and read-only afterwards. When several rows normalize
/// to the same text only the first is kept; later duplicates are shadowed.
#[derive(Debug)]
pub struct CandidateIndex<'a> {
    keys: Vec<String>,
    rows: Vec<&'a Row>,
    by_key: HashMap<String, usize>,
    shadowed: usize,
}

impl<'a> CandidateIndex<'a> {
    /// Index `table` on `key_column`. A missing column is a configuration
    /// error; an empty table yields an empty pool.
    pub fn build(table: &'a Table, key_column: &str) -> Result<Self, AlignError> {
        let col = table.require_column(key_column, Dataset::Curated)?;

        let mut index = CandidateIndex {
            keys: Vec::new(),
            rows: Vec::new(),
            by_key: HashMap::new(),
            shadowed: 0,
        };

        for row in &table.rows {
            let key = normalize_text(row.get(col));
            if index.by_key.contains_key(&key) {
                log::debug!("curated key {key:?} already indexed, later row shadowed");
                index.shadowed += 1;
                continue;
            }
            index.by_key.insert(key.clone(), index.keys.len());
            index.keys.push(key);
            index.rows.push(row);
        }

        Ok(index)
    }

    /// Distinct normalized keys, first-seen order. This is the match pool.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Row for the pool entry at `pos`.
    pub fn row_at(&self, pos: usize) -> Option<&'a Row> {
        self.rows.get(pos).copied()
    }

    pub fn get(&self, key: &str) -> Option<&'a Row> {
        self.by_key.get(key).and_then(|&pos| self.row_at(pos))
    }

    /// Rows dropped because their key duplicated an earlier one.
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }
}

use std::fmt;

/// Which side of the alignment a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// File 1: the curated table whose rows get reordered.
    Curated,
    /// File 2: the reference table that dictates the order.
    Reference,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Curated => "curated",
            Dataset::Reference => "reference",
        }
    }

    /// "File 1" / "File 2", as named in output files and messages.
    pub fn file_label(&self) -> &'static str {
        match self {
            Dataset::Curated => "File 1",
            Dataset::Reference => "File 2",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum AlignError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty key name, etc.).
    ConfigValidation(String),
    /// Key column not present in a table's header.
    MissingColumn {
        dataset: Dataset,
        column: String,
        available: Vec<String>,
    },
    /// Acceptance threshold outside [0, 100].
    InvalidThreshold(u32),
    /// Unknown scorer name.
    UnknownScorer(String),
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { dataset, column, available } => {
                write!(
                    f,
                    "{} key column '{column}' not found. Columns: {available:?}",
                    dataset.file_label()
                )
            }
            Self::InvalidThreshold(t) => {
                write!(f, "threshold must be between 0 and 100, got {t}")
            }
            Self::UnknownScorer(name) => write!(f, "unknown scorer: {name}"),
        }
    }
}

impl std::error::Error for AlignError {}

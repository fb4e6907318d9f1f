use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum IoError {
    /// File could not be opened or read.
    Read { path: PathBuf, message: String },
    /// File opened but its contents are not a readable table.
    Parse { path: PathBuf, message: String },
    /// Requested worksheet does not exist.
    UnknownSheet { path: PathBuf, sheet: String, available: Vec<String> },
    /// Output could not be written.
    Write { path: PathBuf, message: String },
}

impl IoError {
    pub(crate) fn read(path: &Path, err: impl fmt::Display) -> Self {
        Self::Read { path: path.to_path_buf(), message: err.to_string() }
    }

    pub(crate) fn parse(path: &Path, err: impl fmt::Display) -> Self {
        Self::Parse { path: path.to_path_buf(), message: err.to_string() }
    }

    pub(crate) fn write(path: &Path, err: impl fmt::Display) -> Self {
        Self::Write { path: path.to_path_buf(), message: err.to_string() }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::UnknownSheet { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse { path, message } => write!(f, "{}: {message}", path.display()),
            Self::UnknownSheet { path, sheet, available } => write!(
                f,
                "{}: no sheet named '{sheet}' (sheets: {})",
                path.display(),
                available.join(", ")
            ),
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for IoError {}

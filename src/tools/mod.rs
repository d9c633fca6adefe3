pub use self::absences::{AbsenceQuery, AbsenceType, filter_absences};
pub use self::date_time::current_date_time;
pub use self::tables::Table;

mod absences;
mod date_time;
mod tables;

use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub const ABSENCES_FILE: &str = "absences.json";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid data in {file}: {reason}")]
    InvalidData { file: String, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    /// Errors the model can react to; they go back into the transcript as text.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ToolError::InvalidArguments(_) | ToolError::InvalidData { .. }
        )
    }
}

/// Reads the scheduling data files on demand. Nothing is cached between calls.
#[derive(Clone, Debug)]
pub struct DataResolver {
    data_dir: PathBuf,
}

impl DataResolver {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn current_date_time(&self) -> String {
        current_date_time()
    }

    /// Verbatim UTF-8 content of one of the CSV tables.
    pub fn read_table(&self, table: Table) -> Result<String, ToolError> {
        self.read_text(table.file_name())
    }

    /// Filters `absences.json` with the criteria in the raw JSON `arguments`.
    pub fn absences(&self, arguments: &str) -> Result<String, ToolError> {
        let query = AbsenceQuery::from_arguments(arguments)?;
        let text = self.read_text(ABSENCES_FILE)?;
        let records = absences::parse_document(&text)?;
        let matched = filter_absences(&records, &query)?;
        serde_json::to_string(&matched).map_err(|e| ToolError::InvalidData {
            file: ABSENCES_FILE.to_string(),
            reason: e.to_string(),
        })
    }

    fn read_text(&self, file_name: &str) -> Result<String, ToolError> {
        let path = self.data_dir.join(file_name);
        fs::read_to_string(&path).map_err(|source| ToolError::Io { path, source })
    }
}

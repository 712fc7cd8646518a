use std::fmt;

use tariffscope_recon::SourceError;

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentError {
    /// File missing or unreadable.
    Io(String),
    /// Extension is not a spreadsheet or CSV format we read.
    UnsupportedFormat(String),
    /// Workbook could not be opened or parsed.
    Workbook(String),
    /// Named sheet does not exist in the workbook.
    SheetNotFound { sheet: String, available: Vec<String> },
    /// Workbook has no sheets, or the chosen sheet has no rows.
    Empty,
    /// No header row carries this required column.
    MissingColumn(&'static str),
    /// CSV record could not be read.
    Csv(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::UnsupportedFormat(ext) => write!(f, "unsupported document format: '{ext}'"),
            Self::Workbook(msg) => write!(f, "failed to open workbook: {msg}"),
            Self::SheetNotFound { sheet, available } => {
                write!(f, "sheet '{sheet}' not found (available: {})", available.join(", "))
            }
            Self::Empty => write!(f, "document contains no rows"),
            Self::MissingColumn(column) => write!(f, "no header row with a '{column}' column"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for DocumentError {}

impl From<DocumentError> for SourceError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::Io(_) => SourceError::Unavailable(e.to_string()),
            _ => SourceError::Malformed(e.to_string()),
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::FileFormat;

/// Top-level error: a message plus the process exit code it maps to.
///
/// Exit codes: `2` input/load errors, `4` terminal/UI errors.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(2, err.to_string())
    }
}

/// Failure to turn an input file into a `StockTable`.
///
/// Every variant aborts the whole load; no partial table is ever returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file type '{0}': expected a .csv or .xlsx file.")]
    UnsupportedFormat(String),

    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "The file does not contain the expected columns: {}. Missing: {}.",
        quoted(.required),
        quoted(.missing)
    )]
    Schema {
        required: Vec<String>,
        missing: Vec<String>,
    },

    #[error("Failed to parse {format} input: {cause}")]
    Parse {
        format: FileFormat,
        #[source]
        cause: ParseCause,
    },
}

impl LoadError {
    pub fn parse(format: FileFormat, cause: impl Into<ParseCause>) -> Self {
        LoadError::Parse {
            format,
            cause: cause.into(),
        }
    }
}

/// Underlying reason for a `LoadError::Parse`.
#[derive(Debug, Error)]
pub enum ParseCause {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("the workbook has no worksheets")]
    EmptyWorkbook,

    #[error("no header row found")]
    MissingHeader,

    #[error("line {line}, column `{column}`: {message}")]
    Cell {
        line: usize,
        column: String,
        message: String,
    },
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{n}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

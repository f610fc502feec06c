// Single-file ingest
// Every supported file becomes a Table or an error the caller can skip past.

use std::fmt;
use std::path::{Path, PathBuf};

use leadmerge_core::Table;
use serde::Serialize;

use crate::csv as delimited;
use crate::xlsx;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Windows1252,
    Utf8Bom,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf-8"),
            Self::Latin1 => write!(f, "latin-1"),
            Self::Windows1252 => write!(f, "windows-1252"),
            Self::Utf8Bom => write!(f, "utf-8-sig"),
        }
    }
}

/// How a file's table was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceFormat {
    Delimited {
        delimiter: char,
        encoding: TextEncoding,
        sniffed: bool,
    },
    Spreadsheet {
        sheet: String,
    },
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delimited { delimiter, encoding, sniffed } => {
                let shown = match delimiter {
                    '\t' => "\\t".to_string(),
                    other => other.to_string(),
                };
                write!(f, "delimited '{shown}' {encoding}")?;
                if *sniffed {
                    write!(f, " (sniffed)")?;
                }
                Ok(())
            }
            Self::Spreadsheet { sheet } => write!(f, "spreadsheet sheet '{sheet}'"),
        }
    }
}

#[derive(Debug)]
pub struct Ingested {
    pub table: Table,
    pub format: SourceFormat,
}

#[derive(Debug)]
pub enum IngestError {
    /// File could not be opened or read.
    Io { path: PathBuf, message: String },
    /// Extension is not one of the supported input types.
    UnsupportedExtension(PathBuf),
    /// Every delimiter/encoding fallback failed.
    Unreadable { path: PathBuf, reason: String },
    /// Spreadsheet could not be opened or has no readable sheet.
    Spreadsheet { path: PathBuf, message: String },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::UnsupportedExtension(path) => write!(f, "unsupported file type: {}", path.display()),
            Self::Unreadable { path, reason } => {
                write!(f, "could not read file {}: {reason}", path.display())
            }
            Self::Spreadsheet { path, message } => {
                write!(f, "could not read spreadsheet {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {}

/// Kind of input a file extension denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Delimited,
    Spreadsheet,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "tsv" => Some(Self::Delimited),
            "xlsx" | "xlsm" | "xls" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Read one file into a table.
///
/// Delimited files go through the delimiter x encoding grid; spreadsheets
/// are read from their first worksheet. Header names come back trimmed.
pub fn ingest_file(path: &Path) -> Result<Ingested, IngestError> {
    match FileKind::from_path(path) {
        Some(FileKind::Delimited) => {
            let bytes = std::fs::read(path).map_err(|e| IngestError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            let parsed = delimited::read_delimited(&bytes).map_err(|reason| IngestError::Unreadable {
                path: path.to_path_buf(),
                reason,
            })?;
            Ok(Ingested {
                table: parsed.table,
                format: SourceFormat::Delimited {
                    delimiter: char::from(parsed.delimiter),
                    encoding: parsed.encoding,
                    sniffed: parsed.sniffed,
                },
            })
        }
        Some(FileKind::Spreadsheet) => {
            let (table, sheet) = xlsx::read_first_sheet(path).map_err(|message| IngestError::Spreadsheet {
                path: path.to_path_buf(),
                message,
            })?;
            Ok(Ingested { table, format: SourceFormat::Spreadsheet { sheet } })
        }
        None => Err(IngestError::UnsupportedExtension(path.to_path_buf())),
    }
}

//! Campaign operations.
//!
//! A campaign directory holds one sub-folder per source:
//!
//! | Folder  | Role                                      |
//! |---------|-------------------------------------------|
//! | `Clay/` | primary leads, mapped onto the schema     |
//! | `EB/`   | secondary leads to enrich (Enrich only)   |
//! | `DNC/`  | do-not-contact lists (Suppress only)      |
//!
//! Each operation writes one workbook into the campaign directory named
//! `<campaign>_<suffix>_<YYYY-MM-DD>.xlsx`. Failures never escape
//! [`run`]; they come back as an [`OperationStatus::Failure`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use leadmerge_config::AliasConfig;
use leadmerge_core::Table;
use leadmerge_io::{load_primary_folder, load_raw_folder, xlsx, SkippedFile};
use leadmerge_recon::dedupe::{dedupe_by_column, format_output, records_to_output};
use leadmerge_recon::{build_lookup, link, OutputColumn, SuppressionSet};
use log::info;
use serde::Serialize;

pub const PRIMARY_DIR: &str = "Clay";
pub const SECONDARY_DIR: &str = "EB";
pub const SUPPRESSION_DIR: &str = "DNC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Link secondary leads to primary profile URLs.
    Enrich,
    /// Reformat the primary source alone.
    Format,
    /// Drop primary leads listed in the do-not-contact folder.
    Suppress,
}

impl Operation {
    /// Output file name component.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Enrich => "Enriched_EB",
            Self::Format => "Formatted_Clay",
            Self::Suppress => "Cleaned_NoDNC",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enrich => write!(f, "enrich"),
            Self::Format => write!(f, "format"),
            Self::Suppress => write!(f, "suppress"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CampaignError {
    /// A required folder is absent or yielded no usable rows.
    SourceMissing(String),
    /// The secondary source lacks a mandatory column.
    SchemaMismatch(String),
    /// The output workbook could not be written.
    Write { file: String, message: String },
}

impl fmt::Display for CampaignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceMissing(reason) | Self::SchemaMismatch(reason) => write!(f, "{reason}"),
            Self::Write { file, message } => write!(f, "could not save {file}: {message}"),
        }
    }
}

impl std::error::Error for CampaignError {}

/// What an operation did, for `--json` output and logs.
#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub operation: Operation,
    pub output_file: String,
    pub output_path: PathBuf,
    pub rows_written: usize,
    /// Records loaded from the primary folder.
    pub primary_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_profiles: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppressed: Option<usize>,
    pub duplicates_removed: usize,
    pub skipped: Vec<SkippedFile>,
}

impl OperationReport {
    fn new(operation: Operation, primary_rows: usize) -> Self {
        Self {
            operation,
            output_file: String::new(),
            output_path: PathBuf::new(),
            rows_written: 0,
            primary_rows,
            secondary_rows: None,
            lookup_profiles: None,
            matched: None,
            suppressed: None,
            duplicates_removed: 0,
            skipped: Vec::new(),
        }
    }
}

/// Status line handed back to whoever invoked the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Success { file: String },
    Failure { reason: String },
}

impl OperationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { file } => write!(f, "SUCCESS!\nFile saved: {file}"),
            Self::Failure { reason } => write!(f, "Error: {reason}"),
        }
    }
}

impl From<&Result<OperationReport, CampaignError>> for OperationStatus {
    fn from(result: &Result<OperationReport, CampaignError>) -> Self {
        match result {
            Ok(report) => Self::Success { file: report.output_file.clone() },
            Err(e) => Self::Failure { reason: e.to_string() },
        }
    }
}

/// Run `operation` on `dir` with today's date and reduce the outcome to a status.
pub fn run(operation: Operation, dir: &Path, aliases: &AliasConfig) -> OperationStatus {
    let result = execute(operation, dir, aliases, Local::now().date_naive());
    OperationStatus::from(&result)
}

/// Run `operation` on the campaign directory `dir`.
///
/// `date` stamps the output file name. Nothing is written unless every
/// source loaded and the pipeline produced a table.
pub fn execute(
    operation: Operation,
    dir: &Path,
    aliases: &AliasConfig,
    date: NaiveDate,
) -> Result<OperationReport, CampaignError> {
    info!("{operation}: campaign {}", dir.display());
    let (table, mut report) = match operation {
        Operation::Enrich => enrich(dir, aliases)?,
        Operation::Format => format(dir, aliases)?,
        Operation::Suppress => suppress(dir, aliases)?,
    };

    let person_header = OutputColumn::PersonLinkedinUrl.header();
    let (table, removed) = dedupe_by_column(table, person_header);
    report.duplicates_removed = removed;

    let file = output_file_name(dir, operation, date);
    let path = dir.join(&file);
    xlsx::write_table(&table, &path).map_err(|message| CampaignError::Write { file: file.clone(), message })?;
    info!("saved {} rows to {}", table.row_count(), path.display());

    report.rows_written = table.row_count();
    report.output_file = file;
    report.output_path = path;
    Ok(report)
}

fn enrich(dir: &Path, aliases: &AliasConfig) -> Result<(Table, OperationReport), CampaignError> {
    let primary = load_primary_folder(&dir.join(PRIMARY_DIR), aliases);
    if primary.records.is_empty() {
        return Err(CampaignError::SourceMissing(format!("{PRIMARY_DIR} data missing or invalid.")));
    }
    let lookup = build_lookup(&primary.records);

    let secondary = load_raw_folder(&dir.join(SECONDARY_DIR), SECONDARY_DIR);
    if secondary.table.is_empty() {
        return Err(CampaignError::SourceMissing(format!("{SECONDARY_DIR} data missing.")));
    }
    let secondary_rows = secondary.table.row_count();

    let linked = link(&lookup, secondary.table, aliases).map_err(|e| {
        log::warn!("{e}");
        CampaignError::SchemaMismatch(format!("Missing Name/Company columns in {SECONDARY_DIR}."))
    })?;

    let mut report = OperationReport::new(Operation::Enrich, primary.records.len());
    report.secondary_rows = Some(secondary_rows);
    report.lookup_profiles = Some(lookup.len());
    report.matched = Some(linked.matched);
    report.skipped = primary.skipped;
    report.skipped.extend(secondary.skipped);

    let table = format_output(&linked.table, &linked.columns.output_sources());
    Ok((table, report))
}

fn format(dir: &Path, aliases: &AliasConfig) -> Result<(Table, OperationReport), CampaignError> {
    let primary = load_primary_folder(&dir.join(PRIMARY_DIR), aliases);
    if primary.records.is_empty() {
        return Err(CampaignError::SourceMissing(format!("{PRIMARY_DIR} data missing.")));
    }

    let mut report = OperationReport::new(Operation::Format, primary.records.len());
    report.skipped = primary.skipped;
    Ok((records_to_output(&primary.records), report))
}

fn suppress(dir: &Path, aliases: &AliasConfig) -> Result<(Table, OperationReport), CampaignError> {
    let dnc_dir = dir.join(SUPPRESSION_DIR);
    if !dnc_dir.is_dir() {
        return Err(CampaignError::SourceMissing(format!("'{SUPPRESSION_DIR}' folder not found.")));
    }

    let primary = load_primary_folder(&dir.join(PRIMARY_DIR), aliases);
    if primary.records.is_empty() {
        return Err(CampaignError::SourceMissing(format!("{PRIMARY_DIR} data missing.")));
    }

    let dnc = load_raw_folder(&dnc_dir, SUPPRESSION_DIR);
    if dnc.table.is_empty() {
        return Err(CampaignError::SourceMissing(format!("{SUPPRESSION_DIR} folder is empty.")));
    }

    let set = SuppressionSet::from_table(&dnc.table, aliases);
    let mut report = OperationReport::new(Operation::Suppress, primary.records.len());
    let (kept, removed) = set.filter(primary.records);
    report.suppressed = Some(removed);
    report.skipped = primary.skipped;
    report.skipped.extend(dnc.skipped);

    Ok((records_to_output(&kept), report))
}

/// `<campaign>_<suffix>_<YYYY-MM-DD>.xlsx`, where `<campaign>` is the last
/// component of `dir` (resolved when `dir` is `.` or ends in `..`).
pub fn output_file_name(dir: &Path, operation: Operation, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.xlsx",
        campaign_name(dir),
        operation.suffix(),
        date.format("%Y-%m-%d")
    )
}

fn campaign_name(dir: &Path) -> String {
    let named = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());
    named(dir)
        .or_else(|| fs::canonicalize(dir).ok().as_deref().and_then(named))
        .unwrap_or_else(|| "campaign".to_string())
}

// Campaign folder loading
// A folder holds any number of exports; each file is ingested on its own and
// the results are stacked. Bad files are skipped, never fatal.

use std::fs;
use std::path::{Path, PathBuf};

use leadmerge_config::AliasConfig;
use leadmerge_core::Table;
use leadmerge_recon::schema::PrimaryColumns;
use leadmerge_recon::NormalizedRecord;
use log::{info, warn};
use serde::Serialize;

use crate::ingest::ingest_file;

/// Extensions picked up from a folder, in load order.
const EXTENSION_ORDER: [&str; 5] = ["csv", "tsv", "xlsx", "xlsm", "xls"];

/// Prefix Office uses for lock files next to an open workbook.
const LOCK_FILE_PREFIX: &str = "~$";

/// A file that was found but contributed no rows, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedFile {
    fn new(path: &Path, reason: impl Into<String>) -> Self {
        let skipped = Self { path: path.to_path_buf(), reason: reason.into() };
        warn!("skipped '{}': {}", file_label(path), skipped.reason);
        skipped
    }
}

/// Result of loading the primary folder.
#[derive(Debug, Default)]
pub struct PrimaryLoad {
    pub records: Vec<NormalizedRecord>,
    pub files_loaded: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Result of loading a secondary or suppression folder.
#[derive(Debug, Default)]
pub struct RawLoad {
    pub table: Table,
    pub files_loaded: usize,
    pub skipped: Vec<SkippedFile>,
}

fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    EXTENSION_ORDER.iter().position(|e| *e == ext)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Supported files directly inside `dir`, ordered by extension group then name.
///
/// Subdirectories are not searched. A missing or unreadable directory yields
/// an empty list.
pub fn supported_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<(usize, String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            if name.starts_with(LOCK_FILE_PREFIX) {
                return None;
            }
            let rank = extension_rank(&path)?;
            Some((rank, name, path))
        })
        .collect();

    files.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    files.into_iter().map(|(_, _, path)| path).collect()
}

/// Load every primary export in `dir` and map it onto the internal schema.
///
/// Files that cannot be read or that lack a mandatory column are skipped.
/// Records keep file order and row order.
pub fn load_primary_folder(dir: &Path, aliases: &AliasConfig) -> PrimaryLoad {
    info!("reading primary folder {}", dir.display());
    let mut load = PrimaryLoad::default();

    for path in supported_files(dir) {
        let ingested = match ingest_file(&path) {
            Ok(ingested) => ingested,
            Err(e) => {
                load.skipped.push(SkippedFile::new(&path, e.to_string()));
                continue;
            }
        };

        let label = file_label(&path);
        let table = ingested.table;
        info!("file: {label} -> {} rows ({})", table.row_count(), ingested.format);

        let columns = match PrimaryColumns::resolve(&label, table.columns(), aliases) {
            Ok(columns) => columns,
            Err(e) => {
                load.skipped.push(SkippedFile::new(&path, e.to_string()));
                continue;
            }
        };

        load.records.extend(columns.project(&table));
        load.files_loaded += 1;
    }

    if load.files_loaded > 0 {
        info!("total rows loaded from primary folder: {}", load.records.len());
    }
    load
}

/// Load every file in `dir` as-is and stack them, unioning columns by name.
///
/// `label` names the folder in log lines. Unreadable and empty files are
/// skipped.
pub fn load_raw_folder(dir: &Path, label: &str) -> RawLoad {
    info!("reading {label} folder {}", dir.display());
    let mut load = RawLoad::default();

    for path in supported_files(dir) {
        let table = match ingest_file(&path) {
            Ok(ingested) => ingested.table,
            Err(e) => {
                load.skipped.push(SkippedFile::new(&path, e.to_string()));
                continue;
            }
        };

        info!("file: {} -> {} rows", file_label(&path), table.row_count());
        if table.is_empty() {
            load.skipped.push(SkippedFile::new(&path, "no data rows"));
            continue;
        }

        load.table.append(table);
        load.files_loaded += 1;
    }

    load
}

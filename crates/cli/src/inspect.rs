// Single-file inspection: how a file was read and which fields its headers map to.

use std::path::{Path, PathBuf};

use leadmerge_config::AliasConfig;
use leadmerge_io::{ingest_file, IngestError, SourceFormat};
use leadmerge_recon::resolve_column;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct FieldMatch {
    pub field: &'static str,
    pub column: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub columns: Vec<String>,
    pub rows: usize,
    /// Primary-schema fields and the header each resolves to.
    pub fields: Vec<FieldMatch>,
}

impl IngestSummary {
    /// Human-readable multi-line rendering.
    pub fn render(&self) -> String {
        let mut out = format!(
            "file:    {}\nformat:  {}\nrows:    {}\ncolumns: {}\n",
            self.path.display(),
            self.format,
            self.rows,
            self.columns.join(", ")
        );
        out.push_str("fields:\n");
        for m in &self.fields {
            let column = m.column.as_deref().unwrap_or("-");
            out.push_str(&format!("  {:<18} {}\n", m.field, column));
        }
        out
    }
}

pub fn inspect(path: &Path, aliases: &AliasConfig) -> Result<IngestSummary, IngestError> {
    let ingested = ingest_file(path)?;
    let columns = ingested.table.columns().to_vec();

    let candidates: [(&'static str, &[String]); 9] = [
        ("first_name", &aliases.first_name),
        ("last_name", &aliases.last_name),
        ("company", &aliases.company),
        ("secondary_company", &aliases.secondary_company),
        ("person_linkedin", &aliases.person_linkedin),
        ("company_linkedin", &aliases.company_linkedin),
        ("email", &aliases.email),
        ("title", &aliases.title),
        ("website", &aliases.website),
    ];
    let fields = candidates
        .into_iter()
        .map(|(field, names)| FieldMatch {
            field,
            column: resolve_column(&columns, names).map(|idx| columns[idx].clone()),
        })
        .collect();

    Ok(IngestSummary {
        path: path.to_path_buf(),
        format: ingested.format,
        rows: ingested.table.row_count(),
        columns,
        fields,
    })
}

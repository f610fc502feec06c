// Output shaping: canonical columns and duplicate removal

use std::collections::HashSet;

use leadmerge_core::Table;

use crate::model::{NormalizedRecord, OutputColumn};

/// Build the delivery table from `(output column, source column)` pairs.
///
/// Columns come out in `OutputColumn::ORDER`; output columns with no source
/// are omitted rather than emitted blank.
pub fn format_output(table: &Table, sources: &[(OutputColumn, usize)]) -> Table {
    let picked: Vec<(OutputColumn, usize)> = OutputColumn::ORDER
        .iter()
        .filter_map(|col| {
            sources
                .iter()
                .find(|(c, _)| c == col)
                .map(|&(c, idx)| (c, idx))
        })
        .collect();

    let headers = picked.iter().map(|(c, _)| c.header().to_string()).collect();
    let rows = table
        .rows()
        .iter()
        .map(|row| picked.iter().map(|&(_, idx)| row.get(idx).cloned().flatten()).collect())
        .collect();

    Table::with_rows(headers, rows)
}

/// Delivery table for primary records. Every output column is present.
pub fn records_to_output(records: &[NormalizedRecord]) -> Table {
    let headers = OutputColumn::ORDER.iter().map(|c| c.header().to_string()).collect();
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.email.clone(),
                r.first_name.clone(),
                r.last_name.clone(),
                r.person_linkedin.clone(),
                r.title.clone(),
                r.company.clone(),
                r.company_linkedin.clone(),
            ]
        })
        .collect();
    Table::with_rows(headers, rows)
}

/// Drop rows whose value in `column` repeats an earlier row's value.
///
/// The first occurrence is kept. Missing values are never treated as
/// duplicates of each other. Returns the table and the number of rows
/// removed; a table without `column` is returned unchanged.
pub fn dedupe_by_column(mut table: Table, column: &str) -> (Table, usize) {
    let Some(idx) = table.column_index(column) else {
        return (table, 0);
    };

    let mut seen: HashSet<String> = HashSet::new();
    let removed = table.retain_rows(|row| match &row[idx] {
        Some(value) => seen.insert(value.clone()),
        None => true,
    });

    if removed > 0 {
        log::info!("removed {removed} duplicates based on '{column}'");
    }
    (table, removed)
}

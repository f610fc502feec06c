// Mapping of primary-source tables onto the internal schema

use leadmerge_config::AliasConfig;
use leadmerge_core::Table;

use crate::error::ReconError;
use crate::model::NormalizedRecord;
use crate::resolve::resolve_column;

/// Resolved column positions of one primary-source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryColumns {
    pub first_name: usize,
    pub last_name: usize,
    pub company: usize,
    pub person_linkedin: usize,
    pub company_linkedin: Option<usize>,
    pub email: Option<usize>,
    pub title: Option<usize>,
    pub website: Option<usize>,
}

impl PrimaryColumns {
    /// Resolve the four mandatory and four optional fields.
    ///
    /// Fails with every unresolved mandatory field listed, so a skipped file
    /// can be reported precisely.
    pub fn resolve(source: &str, columns: &[String], aliases: &AliasConfig) -> Result<Self, ReconError> {
        let first_name = resolve_column(columns, &aliases.first_name);
        let last_name = resolve_column(columns, &aliases.last_name);
        let company = resolve_column(columns, &aliases.company);
        let person_linkedin = resolve_column(columns, &aliases.person_linkedin);

        match (first_name, last_name, company, person_linkedin) {
            (Some(first_name), Some(last_name), Some(company), Some(person_linkedin)) => Ok(Self {
                first_name,
                last_name,
                company,
                person_linkedin,
                company_linkedin: resolve_column(columns, &aliases.company_linkedin),
                email: resolve_column(columns, &aliases.email),
                title: resolve_column(columns, &aliases.title),
                website: resolve_column(columns, &aliases.website),
            }),
            _ => {
                let fields = [
                    ("first name", first_name),
                    ("last name", last_name),
                    ("company", company),
                    ("person linkedin url", person_linkedin),
                ]
                .iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
                Err(ReconError::MissingColumns { source: source.to_string(), fields })
            }
        }
    }

    /// Project every row of `table` into the internal schema, in row order.
    pub fn project(&self, table: &Table) -> Vec<NormalizedRecord> {
        let pick = |row: &[Option<String>], idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| row.get(i).cloned().flatten())
        };

        table
            .rows()
            .iter()
            .map(|row| {
                let row = row.as_slice();
                NormalizedRecord {
                    first_name: pick(row, Some(self.first_name)),
                    last_name: pick(row, Some(self.last_name)),
                    company: pick(row, Some(self.company)),
                    person_linkedin: pick(row, Some(self.person_linkedin)),
                    company_linkedin: pick(row, self.company_linkedin),
                    email: pick(row, self.email),
                    title: pick(row, self.title),
                    website: pick(row, self.website),
                }
            })
            .collect()
    }
}

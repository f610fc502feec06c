use std::cmp::Ordering;
use std::collections::HashMap;

use leadmerge_config::AliasConfig;
use leadmerge_core::{Cell, Table};

use crate::error::ReconError;
use crate::model::{NormalizedRecord, OutputColumn};
use crate::normalize::identity_key;
use crate::resolve::resolve_column;

// ---------------------------------------------------------------------------
// Lookup table
// ---------------------------------------------------------------------------

/// Profile URLs carried from the primary source into the join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUrls {
    pub person: Cell,
    pub company: Cell,
}

/// Primary records deduplicated by identity key.
#[derive(Debug, Default)]
pub struct Lookup {
    entries: HashMap<String, ProfileUrls>,
}

impl Lookup {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ProfileUrls> {
        self.entries.get(key)
    }
}

/// Descending order with missing values last.
fn desc_missing_last(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Build the lookup table: one entry per identity key.
///
/// Records are stably sorted by person URL then company URL, each descending
/// with missing values last, and the first record per key is kept. A
/// duplicate carrying a profile URL therefore beats one without, and between
/// two URL-bearing duplicates the greatest URL pair wins.
pub fn build_lookup(records: &[NormalizedRecord]) -> Lookup {
    let mut ordered: Vec<&NormalizedRecord> = records.iter().collect();
    ordered.sort_by(|a, b| {
        desc_missing_last(a.person_linkedin.as_deref(), b.person_linkedin.as_deref()).then_with(|| {
            desc_missing_last(a.company_linkedin.as_deref(), b.company_linkedin.as_deref())
        })
    });

    let mut entries = HashMap::with_capacity(ordered.len());
    for record in ordered {
        entries.entry(record.identity_key()).or_insert_with(|| ProfileUrls {
            person: record.person_linkedin.clone(),
            company: record.company_linkedin.clone(),
        });
    }

    log::info!("unique lookup profiles: {}", entries.len());
    Lookup { entries }
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Column positions in the linked secondary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryColumns {
    pub first_name: usize,
    pub last_name: usize,
    pub company: usize,
    pub email: Option<usize>,
    pub title: Option<usize>,
    pub person_linkedin: usize,
    pub company_linkedin: usize,
}

impl SecondaryColumns {
    /// Source column for each output column, in output order.
    pub fn output_sources(&self) -> Vec<(OutputColumn, usize)> {
        let all = [
            (OutputColumn::Email, self.email),
            (OutputColumn::FirstName, Some(self.first_name)),
            (OutputColumn::LastName, Some(self.last_name)),
            (OutputColumn::PersonLinkedinUrl, Some(self.person_linkedin)),
            (OutputColumn::Title, self.title),
            (OutputColumn::Company, Some(self.company)),
            (OutputColumn::CompanyLinkedinUrl, Some(self.company_linkedin)),
        ];
        all.into_iter()
            .filter_map(|(column, idx)| idx.map(|idx| (column, idx)))
            .collect()
    }
}

#[derive(Debug)]
pub struct Linked {
    /// The secondary table, row for row, with the two profile URL columns set.
    pub table: Table,
    pub columns: SecondaryColumns,
    /// Rows that found a lookup entry.
    pub matched: usize,
}

/// Left-join the secondary table against the lookup on identity key.
///
/// Every secondary row is kept, in order; unmatched rows get missing profile
/// URLs. Existing columns named like the output URL columns are overwritten.
pub fn link(lookup: &Lookup, mut secondary: Table, aliases: &AliasConfig) -> Result<Linked, ReconError> {
    let columns = secondary.columns();
    let first_name = resolve_column(columns, &aliases.first_name);
    let last_name = resolve_column(columns, &aliases.last_name);
    let company = resolve_column(columns, &aliases.secondary_company);
    let email = resolve_column(columns, &aliases.email);
    let title = resolve_column(columns, &aliases.title);

    let (Some(first_name), Some(last_name), Some(company)) = (first_name, last_name, company) else {
        let fields = [("first name", first_name), ("last name", last_name), ("company", company)]
            .iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        return Err(ReconError::MissingColumns { source: "secondary".into(), fields });
    };

    let mut person = Vec::with_capacity(secondary.row_count());
    let mut company_urls = Vec::with_capacity(secondary.row_count());
    let mut matched = 0;

    for row in secondary.rows() {
        let key = identity_key(
            row[first_name].as_deref(),
            row[last_name].as_deref(),
            row[company].as_deref(),
        );
        match lookup.get(&key) {
            Some(urls) => {
                matched += 1;
                person.push(urls.person.clone());
                company_urls.push(urls.company.clone());
            }
            None => {
                person.push(None);
                company_urls.push(None);
            }
        }
    }

    let person_header = OutputColumn::PersonLinkedinUrl.header();
    let company_header = OutputColumn::CompanyLinkedinUrl.header();
    secondary.set_column(person_header, person);
    secondary.set_column(company_header, company_urls);

    let person_linkedin = secondary.column_index(person_header).unwrap_or_default();
    let company_linkedin = secondary.column_index(company_header).unwrap_or_default();

    log::info!("linked {matched} of {} secondary rows", secondary.row_count());

    Ok(Linked {
        table: secondary,
        columns: SecondaryColumns {
            first_name,
            last_name,
            company,
            email,
            title,
            person_linkedin,
            company_linkedin,
        },
        matched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(first: &str, last: &str, company: &str, person: Option<&str>, company_url: Option<&str>) -> NormalizedRecord {
        NormalizedRecord {
            first_name: Some(first.into()),
            last_name: Some(last.into()),
            company: Some(company.into()),
            person_linkedin: person.map(Into::into),
            company_linkedin: company_url.map(Into::into),
            ..Default::default()
        }
    }

    fn secondary(rows: &[[Option<&str>; 3]]) -> Table {
        Table::with_rows(
            vec!["FirstName".into(), "LastName".into(), "Account".into()],
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    #[test]
    fn url_bearing_duplicate_wins() {
        let records = vec![
            record("John", "Doe", "Acme", None, None),
            record("john", "DOE", "Acme Inc.", Some("li/john"), Some("li/acme")),
        ];

        let lookup = build_lookup(&records);
        assert_eq!(lookup.len(), 1);
        let urls = lookup.get("john|doe|acme").unwrap();
        assert_eq!(urls.person.as_deref(), Some("li/john"));
        assert_eq!(urls.company.as_deref(), Some("li/acme"));
    }

    #[test]
    fn greatest_url_pair_wins_between_populated_duplicates() {
        let records = vec![
            record("A", "B", "C", Some("li/a"), Some("co/2")),
            record("A", "B", "C", Some("li/b"), Some("co/1")),
            record("A", "B", "C", Some("li/b"), Some("co/3")),
        ];
        let lookup = build_lookup(&records);
        let urls = lookup.get("a|b|c").unwrap();
        assert_eq!(urls.person.as_deref(), Some("li/b"));
        assert_eq!(urls.company.as_deref(), Some("co/3"));
    }

    #[test]
    fn missing_company_url_sorts_after_present_one() {
        let records = vec![
            record("A", "B", "C", Some("li/a"), None),
            record("A", "B", "C", Some("li/a"), Some("co/1")),
        ];
        let lookup = build_lookup(&records);
        assert_eq!(lookup.get("a|b|c").unwrap().company.as_deref(), Some("co/1"));
    }

    #[test]
    fn left_join_keeps_every_secondary_row() {
        let lookup = build_lookup(&[record("John", "Doe", "Acme Inc", Some("P1"), None)]);
        let eb = secondary(&[
            [Some("John"), Some("Doe"), Some("Acme, Inc.")],
            [Some("Jane"), Some("Roe"), Some("Globex")],
            [Some("John"), Some("Doe"), Some("Acme, Inc.")],
            [None, None, None],
        ]);

        let linked = link(&lookup, eb, &AliasConfig::default()).unwrap();

        assert_eq!(linked.table.row_count(), 4);
        assert_eq!(linked.matched, 2);
        let person: Vec<_> = linked.table.column(linked.columns.person_linkedin).collect();
        assert_eq!(person, vec![Some("P1"), None, Some("P1"), None]);
    }

    #[test]
    fn acme_inc_variants_share_a_key() {
        let lookup = build_lookup(&[record("John", "Doe", "Acme Inc", Some("P1"), None)]);
        let eb = secondary(&[[Some("John"), Some("Doe"), Some("Acme, Inc.")]]);
        let linked = link(&lookup, eb, &AliasConfig::default()).unwrap();
        assert_eq!(linked.table.cell(0, linked.columns.person_linkedin), Some("P1"));
    }

    #[test]
    fn existing_url_column_is_overwritten() {
        let lookup = build_lookup(&[record("A", "B", "C", Some("new"), None)]);
        let eb = Table::with_rows(
            vec!["First Name".into(), "Last Name".into(), "Company".into(), "Person Linkedin Url".into()],
            vec![vec![Some("A".into()), Some("B".into()), Some("C".into()), Some("old".into())]],
        );
        let linked = link(&lookup, eb, &AliasConfig::default()).unwrap();
        assert_eq!(linked.columns.person_linkedin, 3);
        assert_eq!(linked.table.column_count(), 5);
        assert_eq!(linked.table.cell(0, 3), Some("new"));
    }

    #[test]
    fn unresolved_secondary_columns_fail() {
        let lookup = Lookup::default();
        let eb = Table::new(vec!["First Name".into(), "Organisation".into()]);
        let err = link(&lookup, eb, &AliasConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ReconError::MissingColumns {
                source: "secondary".into(),
                fields: vec!["last name".into(), "company".into()],
            }
        );
    }

    #[test]
    fn output_sources_skip_unresolved_optionals() {
        let cols = SecondaryColumns {
            first_name: 0,
            last_name: 1,
            company: 2,
            email: None,
            title: Some(3),
            person_linkedin: 4,
            company_linkedin: 5,
        };
        let order: Vec<_> = cols.output_sources().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            order,
            vec![
                OutputColumn::FirstName,
                OutputColumn::LastName,
                OutputColumn::PersonLinkedinUrl,
                OutputColumn::Title,
                OutputColumn::Company,
                OutputColumn::CompanyLinkedinUrl,
            ]
        );
    }
}

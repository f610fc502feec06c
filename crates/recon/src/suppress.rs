// Do-not-contact suppression
// A record is dropped when its company or its website domain is listed.

use std::collections::HashSet;

use leadmerge_config::AliasConfig;
use leadmerge_core::Table;

use crate::model::NormalizedRecord;
use crate::normalize::{clean_match_string, extract_domain};
use crate::resolve::resolve_column;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    companies: HashSet<String>,
    domains: HashSet<String>,
}

impl SuppressionSet {
    /// Build the block lists from a suppression table.
    ///
    /// Both the company and the website column are optional. Values that
    /// normalize to an empty string are never added.
    pub fn from_table(table: &Table, aliases: &AliasConfig) -> Self {
        let columns = table.columns();
        let company_col = resolve_column(columns, &aliases.suppression_company());
        let website_col = resolve_column(columns, &aliases.website);

        let companies = company_col
            .map(|idx| table.column(idx).map(clean_match_string).collect())
            .unwrap_or_else(HashSet::new);
        let domains = website_col
            .map(|idx| table.column(idx).map(extract_domain).collect())
            .unwrap_or_else(HashSet::new);

        let mut set = Self { companies, domains };
        set.companies.remove("");
        set.domains.remove("");

        log::info!(
            "suppression criteria: {} companies, {} domains",
            set.companies.len(),
            set.domains.len()
        );
        set
    }

    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty() && self.domains.is_empty()
    }

    pub fn is_suppressed(&self, record: &NormalizedRecord) -> bool {
        let company = clean_match_string(record.company.as_deref());
        let domain = extract_domain(record.website.as_deref());
        self.companies.contains(&company) || self.domains.contains(&domain)
    }

    /// Keep the records that match neither list. Returns the survivors and
    /// how many were removed.
    pub fn filter(&self, records: Vec<NormalizedRecord>) -> (Vec<NormalizedRecord>, usize) {
        let before = records.len();
        let kept: Vec<_> = records.into_iter().filter(|r| !self.is_suppressed(r)).collect();
        let removed = before - kept.len();
        log::info!("removed {removed} records found in suppression lists");
        (kept, removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dnc(columns: &[&str], rows: &[&[Option<&str>]]) -> Table {
        Table::with_rows(
            columns.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    fn lead(company: Option<&str>, website: Option<&str>) -> NormalizedRecord {
        NormalizedRecord {
            first_name: Some("A".into()),
            company: company.map(Into::into),
            website: website.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn company_match_ignores_case_and_punctuation() {
        let set = SuppressionSet::from_table(
            &dnc(&["Account"], &[&[Some("ACME-CORP.")]]),
            &AliasConfig::default(),
        );
        let (kept, removed) = set.filter(vec![lead(Some("acme corp"), None), lead(Some("Globex"), None)]);
        assert_eq!(removed, 1);
        assert_eq!(kept[0].company.as_deref(), Some("Globex"));
    }

    #[test]
    fn domain_match_removes_record() {
        let set = SuppressionSet::from_table(
            &dnc(&["Website"], &[&[Some("acme.com")]]),
            &AliasConfig::default(),
        );
        assert!(set.is_suppressed(&lead(Some("Anything"), Some("http://www.acme.com/about"))));
        assert!(!set.is_suppressed(&lead(Some("Anything"), Some("acme.co"))));
    }

    #[test]
    fn blank_values_never_suppress() {
        let set = SuppressionSet::from_table(
            &dnc(&["Company", "Website"], &[&[None, Some("   ")], &[Some(" , "), None], &[Some("Acme"), None]]),
            &AliasConfig::default(),
        );
        assert_eq!(set.company_count(), 1);
        assert_eq!(set.domain_count(), 0);
        assert!(!set.is_suppressed(&lead(None, None)));
        assert!(!set.is_suppressed(&lead(Some(""), Some("not a url"))));
    }

    #[test]
    fn exact_not_substring_matching() {
        let set = SuppressionSet::from_table(&dnc(&["Company Name"], &[&[Some("Acme")]]), &AliasConfig::default());
        assert!(!set.is_suppressed(&lead(Some("Acme Holdings"), None)));
    }

    #[test]
    fn no_usable_columns_yields_empty_set() {
        let set = SuppressionSet::from_table(&dnc(&["Notes"], &[&[Some("x")]]), &AliasConfig::default());
        assert!(set.is_empty());
        let (kept, removed) = set.filter(vec![lead(Some("Acme"), None)]);
        assert_eq!((kept.len(), removed), (1, 0));
    }
}

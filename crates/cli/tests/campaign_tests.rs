// End-to-end tests for the campaign operations: fixture folders in, workbook out.
// Run with: cargo test -p leadmerge-cli --test campaign_tests

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use leadmerge_cli::campaign::{execute, run, CampaignError, Operation, OperationStatus};
use leadmerge_config::AliasConfig;
use tempfile::TempDir;

const CLAY_HEADER: &str = "First Name,Last Name,Company Name,Person Linkedin Url,Company Linkedin Url,Website";

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

/// A campaign folder named `Q1` inside a fresh temp dir.
fn campaign() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("Q1");
    fs::create_dir(&dir).unwrap();
    (tmp, dir)
}

fn write_source(dir: &Path, folder: &str, name: &str, content: &str) {
    let folder = dir.join(folder);
    fs::create_dir_all(&folder).unwrap();
    fs::write(folder.join(name), content).unwrap();
}

/// Header row plus data rows of the first sheet, empty cells as "".
fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut workbook = open_workbook_auto(path).expect("output workbook opens");
    let range = workbook.worksheet_range("Sheet1").expect("Sheet1 exists");
    let mut rows = range.rows().map(|row| {
        row.iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
    });
    let header = rows.next().unwrap_or_default();
    (header, rows.collect())
}

// ---------------------------------------------------------------------------
// Enrich
// ---------------------------------------------------------------------------

#[test]
fn enrich_links_company_name_variants() {
    let (_tmp, dir) = campaign();
    write_source(&dir, "Clay", "clay.csv", &format!("{CLAY_HEADER}\nJohn,Doe,Acme Inc,P1,C1,acme.com\n"));
    write_source(
        &dir,
        "EB",
        "eb.csv",
        "First Name,Last Name,Company,Email\njohn,doe,\"Acme, Inc.\",j@acme.com\nJane,Roe,Globex,jane@globex.com\n",
    );

    let report = execute(Operation::Enrich, &dir, &AliasConfig::default(), date()).unwrap();
    assert_eq!(report.output_file, "Q1_Enriched_EB_2024-05-17.xlsx");
    assert_eq!(report.secondary_rows, Some(2));
    assert_eq!(report.matched, Some(1));

    let (header, rows) = read_output(&report.output_path);
    assert_eq!(
        header,
        vec!["Email", "First Name", "Last Name", "Person Linkedin Url", "Company", "Company Linkedin Url"]
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], vec!["j@acme.com", "john", "doe", "P1", "Acme, Inc.", "C1"]);
    assert_eq!(rows[1][3], "");
}

#[test]
fn enrich_prefers_url_bearing_duplicate() {
    let (_tmp, dir) = campaign();
    write_source(
        &dir,
        "Clay",
        "clay.csv",
        &format!("{CLAY_HEADER}\nJohn,Doe,Acme,,,\nJohn,Doe,Acme,P1,,\n"),
    );
    write_source(&dir, "EB", "eb.csv", "FirstName,LastName,Account,Job Title\nJohn,Doe,Acme,CEO\n");

    let report = execute(Operation::Enrich, &dir, &AliasConfig::default(), date()).unwrap();
    assert_eq!(report.lookup_profiles, Some(1));

    let (header, rows) = read_output(&report.output_path);
    // No email column in EB, so the layout starts at First Name.
    assert_eq!(header[2], "Person Linkedin Url");
    assert_eq!(header[3], "Title");
    assert_eq!(rows[0][2], "P1");
    assert_eq!(rows[0][3], "CEO");
}

#[test]
fn enrich_without_eb_folder_is_source_missing() {
    let (_tmp, dir) = campaign();
    write_source(&dir, "Clay", "clay.csv", &format!("{CLAY_HEADER}\nJohn,Doe,Acme,P1,,\n"));

    let err = execute(Operation::Enrich, &dir, &AliasConfig::default(), date()).unwrap_err();
    assert_eq!(err, CampaignError::SourceMissing("EB data missing.".into()));
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1, "no output written");
}

#[test]
fn enrich_with_unusable_clay_reports_invalid() {
    let (_tmp, dir) = campaign();
    write_source(&dir, "Clay", "clay.csv", "First Name,Last Name\nJohn,Doe\n");
    write_source(&dir, "EB", "eb.csv", "First Name,Last Name,Company\nJohn,Doe,Acme\n");

    let status = run(Operation::Enrich, &dir, &AliasConfig::default());
    assert_eq!(status.to_string(), "Error: Clay data missing or invalid.");
}

#[test]
fn enrich_with_eb_missing_company_is_schema_mismatch() {
    let (_tmp, dir) = campaign();
    write_source(&dir, "Clay", "clay.csv", &format!("{CLAY_HEADER}\nJohn,Doe,Acme,P1,,\n"));
    write_source(&dir, "EB", "eb.csv", "First Name,Last Name,Email\nJohn,Doe,j@acme.com\n");

    let err = execute(Operation::Enrich, &dir, &AliasConfig::default(), date()).unwrap_err();
    assert_eq!(err, CampaignError::SchemaMismatch("Missing Name/Company columns in EB.".into()));
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

#[test]
fn format_dedupes_on_person_url_and_keeps_missing() {
    let (_tmp, dir) = campaign();
    write_source(
        &dir,
        "Clay",
        "clay.csv",
        &format!("{CLAY_HEADER}\nAnn,Lee,Acme,P,,\nBob,Ray,Acme,,,\nCat,Sun,Acme,P,,\n"),
    );

    let report = execute(Operation::Format, &dir, &AliasConfig::default(), date()).unwrap();
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.rows_written, 2);

    let (header, rows) = read_output(&report.output_path);
    assert_eq!(
        header,
        vec![
            "Email",
            "First Name",
            "Last Name",
            "Person Linkedin Url",
            "Title",
            "Company",
            "Company Linkedin Url"
        ]
    );
    assert_eq!(rows[0][1], "Ann");
    assert_eq!(rows[1][1], "Bob");
}

#[test]
fn format_reads_spreadsheets_and_skips_bad_files() {
    let (_tmp, dir) = campaign();
    let clay = dir.join("Clay");
    fs::create_dir(&clay).unwrap();

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, value) in ["FirstName", "LastName", "Organization", "Linkedin", "Work Email"].iter().enumerate() {
        sheet.write_string(0, col as u16, *value).unwrap();
    }
    for (col, value) in ["Ann", "Lee", "Acme", "P9", "ann@acme.com"].iter().enumerate() {
        sheet.write_string(1, col as u16, *value).unwrap();
    }
    workbook.save(clay.join("export.xlsx")).unwrap();
    fs::write(clay.join("notes.csv"), "Just,Notes\nnothing,useful\n").unwrap();

    let report = execute(Operation::Format, &dir, &AliasConfig::default(), date()).unwrap();
    assert_eq!(report.primary_rows, 1);
    assert_eq!(report.skipped.len(), 1);

    let (_, rows) = read_output(&report.output_path);
    assert_eq!(rows[0][0], "ann@acme.com");
    assert_eq!(rows[0][3], "P9");
}

#[test]
fn write_failure_leaves_no_partial_output() {
    let (_tmp, dir) = campaign();
    write_source(&dir, "Clay", "clay.csv", &format!("{CLAY_HEADER}\nAnn,Lee,Acme,P,,\n"));
    // A directory squatting on the output name makes the final rename fail.
    let blocked = dir.join("Q1_Formatted_Clay_2024-05-17.xlsx");
    fs::create_dir(&blocked).unwrap();

    let err = execute(Operation::Format, &dir, &AliasConfig::default(), date()).unwrap_err();
    assert!(matches!(err, CampaignError::Write { .. }));
    assert!(blocked.is_dir());
    assert!(!dir.join("Q1_Formatted_Clay_2024-05-17.xlsx.partial").exists());
}

// ---------------------------------------------------------------------------
// Suppress
// ---------------------------------------------------------------------------

#[test]
fn suppress_by_domain_and_company() {
    let (_tmp, dir) = campaign();
    write_source(
        &dir,
        "Clay",
        "clay.csv",
        &format!(
            "{CLAY_HEADER}\n\
             Ann,Lee,Anything,P1,,http://www.acme.com/about\n\
             Bob,Ray,Initech,P2,,initech.com\n\
             Cat,Sun,Globex Corp,P3,,\n"
        ),
    );
    write_source(&dir, "DNC", "dnc.csv", "Website,Account\nacme.com,\n,GLOBEX-CORP.\n");

    let report = execute(Operation::Suppress, &dir, &AliasConfig::default(), date()).unwrap();
    assert_eq!(report.output_file, "Q1_Cleaned_NoDNC_2024-05-17.xlsx");
    assert_eq!(report.suppressed, Some(2));

    let (_, rows) = read_output(&report.output_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "Bob");
}

#[test]
fn suppress_with_empty_dnc_folder() {
    let (_tmp, dir) = campaign();
    write_source(&dir, "Clay", "clay.csv", &format!("{CLAY_HEADER}\nAnn,Lee,Acme,P1,,\n"));
    fs::create_dir(dir.join("DNC")).unwrap();

    let status = run(Operation::Suppress, &dir, &AliasConfig::default());
    assert_eq!(status, OperationStatus::Failure { reason: "DNC folder is empty.".into() });
}

use std::fmt;

use leadmerge_core::Cell;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Internal schema
// ---------------------------------------------------------------------------

/// A primary-source row mapped onto the fixed internal schema.
///
/// Mandatory fields may still hold missing cells (the column exists but the
/// row is blank); optional fields are `None` when their column was never
/// resolved for the source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub first_name: Cell,
    pub last_name: Cell,
    pub company: Cell,
    pub person_linkedin: Cell,
    pub company_linkedin: Cell,
    pub email: Cell,
    pub title: Cell,
    pub website: Cell,
}

impl NormalizedRecord {
    pub fn identity_key(&self) -> String {
        crate::normalize::identity_key(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.company.as_deref(),
        )
    }
}

// ---------------------------------------------------------------------------
// Output schema
// ---------------------------------------------------------------------------

/// Columns of the delivered spreadsheet, in delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputColumn {
    Email,
    FirstName,
    LastName,
    PersonLinkedinUrl,
    Title,
    Company,
    CompanyLinkedinUrl,
}

impl OutputColumn {
    pub const ORDER: [OutputColumn; 7] = [
        Self::Email,
        Self::FirstName,
        Self::LastName,
        Self::PersonLinkedinUrl,
        Self::Title,
        Self::Company,
        Self::CompanyLinkedinUrl,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::PersonLinkedinUrl => "Person Linkedin Url",
            Self::Title => "Title",
            Self::Company => "Company",
            Self::CompanyLinkedinUrl => "Company Linkedin Url",
        }
    }
}

impl fmt::Display for OutputColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// Column alias tables
// Loaded from ~/.config/leadmerge/aliases.toml (optional)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered header candidates for every logical field the pipeline reads.
///
/// Matching is case-insensitive and the first listed candidate present in a
/// table wins. A TOML file only needs the fields it wants to change; the rest
/// keep their built-in lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AliasConfig {
    pub first_name: Vec<String>,
    pub last_name: Vec<String>,
    pub person_linkedin: Vec<String>,
    /// Company column in the primary (Clay) export.
    pub company: Vec<String>,
    /// Company column in the secondary (EB) export.
    pub secondary_company: Vec<String>,
    pub company_linkedin: Vec<String>,
    pub email: Vec<String>,
    pub title: Vec<String>,
    pub website: Vec<String>,
}

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            first_name: list(&["First Name", "FirstName"]),
            last_name: list(&["Last Name", "LastName"]),
            person_linkedin: list(&["Person Linkedin Url", "Personal LinkedIn", "Linkedin"]),
            company: list(&["FINAL Company Name", "Company Name", "Company", "Organization"]),
            secondary_company: list(&["Company", "Company Name", "Account"]),
            company_linkedin: list(&["Company Linkedin Url", "Company Linkedin", "Organization Linkedin Url"]),
            email: list(&["Email", "Work Email", "Email Address", "E-mail"]),
            title: list(&["Title", "Job Title", "Position"]),
            website: list(&["Website", "Company Website", "Company Domain", "Domain", "Website URL"]),
        }
    }
}

#[derive(Debug)]
pub enum AliasError {
    /// Alias file could not be read or written.
    Io { path: PathBuf, message: String },
    /// Alias file is not valid TOML for this schema.
    Parse(String),
}

impl fmt::Display for AliasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse(msg) => write!(f, "alias config parse error: {msg}"),
        }
    }
}

impl std::error::Error for AliasError {}

impl AliasConfig {
    /// Default location of the user's alias overrides.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("leadmerge")
            .join("aliases.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, AliasError> {
        toml::from_str(input).map_err(|e| AliasError::Parse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, AliasError> {
        toml::to_string_pretty(self).map_err(|e| AliasError::Parse(e.to_string()))
    }

    pub fn load_from(path: &Path) -> Result<Self, AliasError> {
        let contents = fs::read_to_string(path).map_err(|e| AliasError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&contents)?;
        log::debug!("loaded column aliases from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path, else from the default location when it
    /// exists, else the built-in tables.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AliasError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Company candidates for do-not-contact lists, which may come from either tool.
    pub fn suppression_company(&self) -> Vec<String> {
        let mut out = self.company.clone();
        out.extend(self.secondary_company.iter().cloned());
        out
    }
}

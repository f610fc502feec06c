//! CLI Exit Code Registry
//!
//! Single source of truth for `leadmerge` exit codes. Scripts that batch
//! campaign folders rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | General error (unspecified)                           |
//! | 2    | Usage error (bad args, unreadable alias file)         |
//! | 3    | Source missing (folder absent or no usable rows)      |
//! | 4    | Schema mismatch (secondary source lacks a column)     |
//! | 5    | Write failure (output workbook could not be saved)    |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map it in `campaign_exit_code` or the command that raises it

use leadmerge_cli::campaign::CampaignError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or an alias file that cannot be loaded.
pub const EXIT_USAGE: u8 = 2;

/// A required campaign folder is absent or produced no usable rows.
pub const EXIT_SOURCE_MISSING: u8 = 3;

/// The secondary source has no resolvable first name, last name or company column.
pub const EXIT_SCHEMA_MISMATCH: u8 = 4;

/// The output workbook could not be written.
pub const EXIT_WRITE_FAILURE: u8 = 5;

/// Map a CampaignError to its exit code.
pub fn campaign_exit_code(err: &CampaignError) -> u8 {
    match err {
        CampaignError::SourceMissing(_) => EXIT_SOURCE_MISSING,
        CampaignError::SchemaMismatch(_) => EXIT_SCHEMA_MISMATCH,
        CampaignError::Write { .. } => EXIT_WRITE_FAILURE,
    }
}
